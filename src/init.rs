//! The AM625 `board_init_f` sequence.
//!
//! [`board_init_f`] is the first SoC code the loader runs. It snapshots the ROM
//! handoff, opens the control MMRs, and brings up just enough of the system
//! (pin control for the firmware UARTs, console, system firmware, clocks, DDR)
//! for the load stage to continue. Everything beyond register pokes is
//! delegated to [`SplServices`].
//!
//! Only two conditions stop the sequence: ROM did not load the system firmware,
//! or DDR failed to initialize. Other service failures are logged and skipped.

use core::fmt;

use crate::{bootparams::BootParams, mmio::Bus, mmr};

/// Serial devices whose pins must be set before the firmware images run.
///
/// Sequence 0 is WKUP_UART0, used by the DM firmware. Sequence 3 is MAIN_UART1,
/// used by TIFS.
pub const FIRMWARE_UART_SEQS: [u32; 2] = [0, 3];

/// Error code reported by an external service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceError(pub i32);

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conditions that halt the boot stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// ROM did not load the TIFS firmware.
    SysfwNotLoaded,
    /// The DDR controller failed to come up.
    DramInit(ServiceError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SysfwNotLoaded => f.write_str("ROM has not loaded TIFS firmware"),
            Self::DramInit(err) => write!(f, "DRAM init failed: {err}"),
        }
    }
}

/// Which optional steps [`board_init_f`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitConfig {
    /// Configure the R5 MPU regions.
    pub mpu_regions: bool,
    /// Bring up an early console, e.g. for UART boot.
    pub early_console: bool,
    /// Start the system controller firmware.
    pub load_sysfw: bool,
    /// Probe the clock driver for its default configuration.
    pub probe_clocks: bool,
    /// Probe the DDR subsystem.
    pub probe_ddr: bool,
}

impl InitConfig {
    /// The configuration selected by this crate's features.
    pub const DEFAULT: Self = Self {
        mpu_regions: cfg!(feature = "cpu-v7r"),
        early_console: cfg!(feature = "early-console"),
        load_sysfw: cfg!(feature = "load-sysfw"),
        probe_clocks: cfg!(feature = "clk-k3"),
        probe_ddr: cfg!(feature = "ddr"),
    };
}

impl Default for InitConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Services provided by the surrounding loader.
pub trait SplServices {
    /// A device found by the device model.
    type Device;

    /// Program the MPU regions. Only used on the R5.
    fn setup_mpu_regions(&mut self) {}
    /// Initialize the device model.
    fn early_init(&mut self);
    /// Find the serial device that would take sequence number `seq`, without
    /// probing it.
    fn find_serial_by_seq(&mut self, seq: u32) -> Result<Self::Device, ServiceError>;
    /// Apply the named pin-control state to `device`.
    fn pinctrl_select_state(
        &mut self,
        device: &Self::Device,
        state: &str,
    ) -> Result<(), ServiceError>;
    /// Bring up the loader's console.
    fn console_init(&mut self);
    /// Bring up a console usable before the system firmware runs.
    fn early_console_init(&mut self);
    /// Configure and start the system controller firmware.
    fn load_sysfw(&mut self);
    /// Probe the clock driver.
    fn probe_clocks(&mut self) -> Result<(), ServiceError>;
    /// Report the running system firmware version.
    fn print_sysfw_version(&mut self);
    /// Probe RAM device 0, training DDR.
    fn probe_ram(&mut self) -> Result<(), ServiceError>;
}

/// Run the early board initialization.
///
/// Returns the ROM handoff snapshot for the rest of the boot stage. On error,
/// the caller must halt.
pub fn board_init_f<S: SplServices>(
    bus: &mut impl Bus,
    services: &mut S,
    config: &InitConfig,
) -> Result<BootParams, InitError> {
    // ROM's handoff lives where the SPL heap will go. Nothing runs before this.
    let params = BootParams::capture(&*bus);
    log::info!("ROM boot index {}", params.boot_index);

    if config.mpu_regions {
        services.setup_mpu_regions();
    }

    mmr::ctrl_mmr_unlock(bus);

    services.early_init();

    for seq in FIRMWARE_UART_SEQS {
        let pinctrl = services
            .find_serial_by_seq(seq)
            .and_then(|dev| services.pinctrl_select_state(&dev, "default"));
        if let Err(err) = pinctrl {
            log::warn!("serial{seq}: pinctrl not applied ({err})");
        }
    }

    services.console_init();
    if config.early_console {
        services.early_console_init();
    }

    if config.load_sysfw {
        if !params.rom_data.is_sysfw_loaded() {
            return Err(InitError::SysfwNotLoaded);
        }
        services.load_sysfw();
    }

    if config.probe_clocks && services.probe_clocks().is_err() {
        log::error!("Failed to initialize clk-k3!");
    }

    services.print_sysfw_version();

    if config.probe_ddr {
        services.probe_ram().map_err(InitError::DramInit)?;
    }

    Ok(params)
}
