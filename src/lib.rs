//! SPL bring-up support for TI K3 AM625 processors, plus AM43xx pad configuration.
//!
//! This crate holds the SoC-specific pieces a second-stage program loader (SPL)
//! runs before it can load the next boot stage:
//!
//! - a snapshot of the boot information ROM leaves in SRAM.
//! - the control MMR unlock sequence.
//! - the `board_init_f` sequence, which drives the loader's own services.
//! - boot media selection from the latched boot-mode pins.
//! - pad configuration tables and the routine that applies them.
//!
//! Like a runtime crate, it also carries a build-time API to define the SPL memory
//! map. Both APIs are exposed from the same package. The interface changes
//! depending on the build environment.
//!
//! # Dependencies
//!
//! In your SPL package, depend on `ti-spl` in both of
//!
//! - the `[dependencies]` section of your Cargo.toml
//! - the `[build-dependencies]` section of your Cargo.toml
//!
//! Use the same crate version in both locations.
//!
//! ```text
//! [dependencies.ti-spl]
//! version = # $VERSION
//!
//! [build-dependencies.ti-spl]
//! version = # Same as $VERSION
//! ```
//!
//! # Host configuration
//!
//! In your package, create a `build.rs` script that generates the memory map.
//! The simplest `build.rs` looks like this:
//!
//! ```no_run
//! use ti_spl::{Family, SplBuilder};
//!
//! fn main() {
//!     SplBuilder::new(Family::Am625).build().unwrap();
//! }
//! ```
//!
//! Then link against `ti-spl-link.x`. See [`SplBuilder`] for the
//! available settings.
//!
//! # Target integration
//!
//! Call [`board_init_f`] first thing from your loader's board hook. It returns
//! the [`BootParams`] snapshot; keep it and pass it to [`spl_boot_device`] when
//! the loader asks for the boot media.
//!
//! ```ignore
//! use ti_spl::{board_init_f, spl_boot_device, InitConfig, Mmio};
//!
//! let mut bus = unsafe { Mmio::steal() };
//! let params = match board_init_f(&mut bus, &mut services, &InitConfig::DEFAULT) {
//!     Ok(params) => params,
//!     Err(err) => panic!("{err}"),
//! };
//! let device = spl_boot_device(&bus, &params);
//! ```
//!
//! The loader's device model, pin control, console, firmware loader, clock and
//! DDR drivers are reached through [`SplServices`]. Implement it on top of your
//! loader.
//!
//! # Feature flags
//!
//! Features select the steps in [`InitConfig::DEFAULT`].
//!
//! | Feature         | Step                                     |
//! | --------------- | ---------------------------------------- |
//! | `cpu-v7r`       | Program the R5 MPU regions.              |
//! | `early-console` | Bring up an early console.               |
//! | `load-sysfw`    | Check for and start the system firmware. |
//! | `clk-k3`        | Probe the clock driver.                  |
//! | `ddr`           | Probe and train DDR.                     |
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade. Install a logger once the
//! console works; records emitted before that are dropped.

#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_std)]

pub mod bootmedia;
pub mod bootparams;
pub mod init;
pub mod mmio;
pub mod mmr;
pub mod padconf;
pub mod soc;

pub use bootmedia::{spl_boot_device, spl_boot_mode, BootDevice, MmcMode};
pub use bootparams::{BootParams, RomExtendedBootData};
pub use init::{board_init_f, InitConfig, InitError, ServiceError, SplServices};
pub use mmio::Bus;
pub use padconf::{configure_module_pin_mux, PadConfig, PadMux};

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "arm", target_os = "none"))] {
        mod target;
        pub use target::*;
    } else {
        mod host;
        pub use host::*;
    }
}
