//! AM43xx mini board pin multiplexing.

use ti_spl::padconf::{PULLUDDIS, PULLUP_EN, RXACTIVE, SLEWCTRL, mode, offset};
use ti_spl::{PadConfig, PadMux, configure_module_pin_mux};

pub const UART0_PIN_MUX: [PadMux; 2] = [
    PadMux::new(offset::UART0_RXD, mode(0) | PULLUP_EN | RXACTIVE | SLEWCTRL),
    PadMux::new(offset::UART0_TXD, mode(0) | PULLUDDIS | PULLUP_EN | SLEWCTRL),
];

pub const MMC0_PIN_MUX: [PadMux; 6] = [
    PadMux::new(offset::MMC0_CLK, mode(0) | PULLUDDIS | RXACTIVE),
    PadMux::new(offset::MMC0_CMD, mode(0) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::MMC0_DAT0, mode(0) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::MMC0_DAT1, mode(0) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::MMC0_DAT2, mode(0) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::MMC0_DAT3, mode(0) | PULLUP_EN | RXACTIVE),
];

/// MMC1 is routed over the GPMC pads, mode 2.
pub const MMC1_PIN_MUX: [PadMux; 10] = [
    PadMux::new(offset::GPMC_CSN1, mode(2) | PULLUDDIS | RXACTIVE), // mmc1_clk
    PadMux::new(offset::GPMC_CSN2, mode(2) | PULLUP_EN | RXACTIVE), // mmc1_cmd
    PadMux::new(offset::GPMC_AD8, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD9, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD10, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD11, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD12, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD13, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD14, mode(2) | PULLUP_EN | RXACTIVE),
    PadMux::new(offset::GPMC_AD15, mode(2) | PULLUP_EN | RXACTIVE),
];

pub const I2C0_PIN_MUX: [PadMux; 2] = [
    PadMux::new(offset::I2C0_SDA, mode(0) | PULLUP_EN | RXACTIVE | SLEWCTRL),
    PadMux::new(offset::I2C0_SCL, mode(0) | PULLUP_EN | RXACTIVE | SLEWCTRL),
];

/// GPIO5_7 drives the DDR VTT regulator enable.
pub const GPIO5_7_PIN_MUX: [PadMux; 1] = [PadMux::new(offset::SPI0_CS0, mode(7) | PULLUP_EN)];

pub fn enable_uart0_pin_mux(pads: &mut impl PadConfig) {
    configure_module_pin_mux(pads, &UART0_PIN_MUX);
}

/// Configure every pad the board needs besides the console.
pub fn enable_board_pin_mux(pads: &mut impl PadConfig) {
    configure_module_pin_mux(pads, &MMC0_PIN_MUX);
    configure_module_pin_mux(pads, &MMC1_PIN_MUX);
    configure_module_pin_mux(pads, &I2C0_PIN_MUX);
    configure_module_pin_mux(pads, &GPIO5_7_PIN_MUX);
}

pub fn enable_i2c0_pin_mux(pads: &mut impl PadConfig) {
    configure_module_pin_mux(pads, &I2C0_PIN_MUX);
}

/// Prepare the board: console pads first, then everything else.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub fn prepare() {
    use ti_spl::{Mmio, padconf::ControlModule};

    // Safety: the control module is the only thing we touch, at fixed pad offsets.
    let mut ctrl = ControlModule::new(unsafe { Mmio::steal() });
    enable_uart0_pin_mux(&mut ctrl);
    enable_board_pin_mux(&mut ctrl);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pads(Vec<PadMux>);

    impl PadConfig for Pads {
        fn configure(&mut self, pad: PadMux) {
            self.0.push(pad);
        }
    }

    #[test]
    fn board_pin_mux_order() {
        let mut pads = Pads::default();
        enable_board_pin_mux(&mut pads);

        let expected: Vec<PadMux> = MMC0_PIN_MUX
            .iter()
            .chain(&MMC1_PIN_MUX)
            .chain(&I2C0_PIN_MUX)
            .chain(&GPIO5_7_PIN_MUX)
            .copied()
            .collect();
        assert_eq!(pads.0, expected);
        assert_eq!(pads.0.len(), 19);
    }

    #[test]
    fn uart0_only_touches_console_pads() {
        let mut pads = Pads::default();
        enable_uart0_pin_mux(&mut pads);
        assert_eq!(pads.0, UART0_PIN_MUX);
        assert_eq!(pads.0[0].offset, 0x970);
        assert_eq!(pads.0[0].value, 0x000E_0000);
        assert_eq!(pads.0[1].offset, 0x974);
        assert_eq!(pads.0[1].value, 0x000B_0000);
    }

    #[test]
    fn i2c0_alone() {
        let mut pads = Pads::default();
        enable_i2c0_pin_mux(&mut pads);
        assert_eq!(pads.0, I2C0_PIN_MUX);
    }

    #[test]
    fn ddr_vtt_gpio() {
        assert_eq!(
            GPIO5_7_PIN_MUX,
            [PadMux {
                offset: 0x95C,
                value: 7 | (1 << 17),
            }]
        );
    }

    #[test]
    fn mmc_pads_receive() {
        for pad in MMC0_PIN_MUX.iter().chain(&MMC1_PIN_MUX) {
            assert_ne!(pad.value & RXACTIVE, 0, "{pad:?}");
        }
        for pad in &MMC1_PIN_MUX {
            assert_eq!(pad.value & 0xF, 2, "{pad:?}");
        }
    }
}
