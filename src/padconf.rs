//! AM43xx pad configuration.
//!
//! Each pad has a 32-bit configuration register in the control module. A board
//! describes a peripheral's pins as a table of [`PadMux`] entries and hands the
//! table to [`configure_module_pin_mux`].

use crate::mmio::Bus;

/// AM43xx control module base.
pub const CTRL_BASE: u32 = 0x44E1_0000;

/// Select mux mode `mode` (0 through 9).
pub const fn mode(mode: u32) -> u32 {
    mode
}
/// Disable the internal pull resistor.
pub const PULLUDDIS: u32 = 1 << 16;
/// Pull up when the pull is enabled.
pub const PULLUP_EN: u32 = 1 << 17;
/// Enable the input buffer.
pub const RXACTIVE: u32 = 1 << 18;
/// Slow slew rate.
pub const SLEWCTRL: u32 = 1 << 19;

/// Pad register offsets, relative to [`CTRL_BASE`].
pub mod offset {
    pub const GPMC_AD8: u32 = 0x820;
    pub const GPMC_AD9: u32 = 0x824;
    pub const GPMC_AD10: u32 = 0x828;
    pub const GPMC_AD11: u32 = 0x82C;
    pub const GPMC_AD12: u32 = 0x830;
    pub const GPMC_AD13: u32 = 0x834;
    pub const GPMC_AD14: u32 = 0x838;
    pub const GPMC_AD15: u32 = 0x83C;
    pub const GPMC_CSN1: u32 = 0x880;
    pub const GPMC_CSN2: u32 = 0x884;
    pub const MMC0_DAT3: u32 = 0x8F0;
    pub const MMC0_DAT2: u32 = 0x8F4;
    pub const MMC0_DAT1: u32 = 0x8F8;
    pub const MMC0_DAT0: u32 = 0x8FC;
    pub const MMC0_CLK: u32 = 0x900;
    pub const MMC0_CMD: u32 = 0x904;
    pub const SPI0_CS0: u32 = 0x95C;
    pub const UART0_RXD: u32 = 0x970;
    pub const UART0_TXD: u32 = 0x974;
    pub const I2C0_SDA: u32 = 0x988;
    pub const I2C0_SCL: u32 = 0x98C;
}

/// One pad's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadMux {
    /// Register offset from [`CTRL_BASE`].
    pub offset: u32,
    /// Mode and pad-control bits.
    pub value: u32,
}

impl PadMux {
    /// Configure the pad at `offset` with `value`.
    pub const fn new(offset: u32, value: u32) -> Self {
        Self { offset, value }
    }
}

/// Applies a single pad configuration.
pub trait PadConfig {
    /// Write `pad.value` to the pad's configuration register.
    fn configure(&mut self, pad: PadMux);
}

/// The AM43xx control module, reached through a [`Bus`].
pub struct ControlModule<B> {
    bus: B,
}

impl<B: Bus> ControlModule<B> {
    /// Access the control module through `bus`.
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Release the bus.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B: Bus> PadConfig for ControlModule<B> {
    fn configure(&mut self, pad: PadMux) {
        self.bus.write32(CTRL_BASE + pad.offset, pad.value);
    }
}

/// Apply every entry of `table`, in order.
pub fn configure_module_pin_mux(pads: &mut impl PadConfig, table: &[PadMux]) {
    for pad in table {
        pads.configure(*pad);
    }
}
