//! AM625 SK support.
//!
//! The surrounding loader provides the services below as C symbols. Most are
//! the loader's own API. The `ti_spl_*` shims wrap device-model lookups whose
//! arguments depend on the loader's build.

use core::{
    ffi::{c_char, c_int, c_void},
    fmt::{self, Write as _},
    ops::Range,
    ptr::{self, NonNull},
};

use ti_spl::{
    BootDevice, BootParams, InitConfig, MmcMode, Mmio, ServiceError, SplServices, board_init_f,
    heap_end, heap_start, spl_boot_device, spl_boot_mode,
};

unsafe extern "C" {
    fn setup_k3_mpu_regions();
    fn spl_early_init() -> c_int;
    fn ti_spl_find_serial_by_seq(seq: c_int, dev: *mut *mut c_void) -> c_int;
    fn pinctrl_select_state(dev: *mut c_void, statename: *const c_char) -> c_int;
    fn preloader_console_init();
    fn early_console_init() -> c_int;
    fn k3_sysfw_loader(
        rom_loaded_sysfw: bool,
        config_pm_pre_callback: Option<unsafe extern "C" fn()>,
        config_pm_done_callback: Option<unsafe extern "C" fn()>,
    );
    fn ti_spl_probe_clk() -> c_int;
    fn k3_sysfw_print_ver();
    fn ti_spl_probe_ram(index: c_int) -> c_int;
    fn putc(c: c_char);
}

/// Error code for a state name that doesn't fit [`STATE_NAME_LEN`].
const EINVAL: i32 = 22;
const STATE_NAME_LEN: usize = 32;

fn check(ret: c_int) -> Result<(), ServiceError> {
    if ret == 0 { Ok(()) } else { Err(ServiceError(ret)) }
}

/// A device found by the loader's device model.
pub struct Device(NonNull<c_void>);

/// [`SplServices`] backed by the loader.
struct Loader;

impl SplServices for Loader {
    type Device = Device;

    fn setup_mpu_regions(&mut self) {
        unsafe { setup_k3_mpu_regions() }
    }
    fn early_init(&mut self) {
        if let Err(err) = check(unsafe { spl_early_init() }) {
            log::warn!("spl_early_init: {err}");
        }
    }
    fn find_serial_by_seq(&mut self, seq: u32) -> Result<Device, ServiceError> {
        let mut dev = ptr::null_mut();
        check(unsafe { ti_spl_find_serial_by_seq(seq as c_int, &mut dev) })?;
        NonNull::new(dev).map(Device).ok_or(ServiceError(-19))
    }
    fn pinctrl_select_state(&mut self, device: &Device, state: &str) -> Result<(), ServiceError> {
        let mut name = [0u8; STATE_NAME_LEN];
        if state.len() >= name.len() {
            return Err(ServiceError(-EINVAL));
        }
        name[..state.len()].copy_from_slice(state.as_bytes());
        check(unsafe { pinctrl_select_state(device.0.as_ptr(), name.as_ptr().cast()) })
    }
    fn console_init(&mut self) {
        unsafe { preloader_console_init() };
        if log::set_logger(&CONSOLE).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
    fn early_console_init(&mut self) {
        if let Err(err) = check(unsafe { early_console_init() }) {
            log::warn!("early console: {err}");
        }
    }
    fn load_sysfw(&mut self) {
        unsafe { k3_sysfw_loader(true, None, None) }
    }
    fn probe_clocks(&mut self) -> Result<(), ServiceError> {
        check(unsafe { ti_spl_probe_clk() })
    }
    fn print_sysfw_version(&mut self) {
        unsafe { k3_sysfw_print_ver() }
    }
    fn probe_ram(&mut self) -> Result<(), ServiceError> {
        check(unsafe { ti_spl_probe_ram(0) })
    }
}

/// Writes log records to the loader's console.
struct Console;

static CONSOLE: Console = Console;

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            unsafe { putc(byte as c_char) };
        }
        Ok(())
    }
}

impl log::Log for Console {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }
    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(Console, "{}: {}", record.level(), record.args());
        }
    }
    fn flush(&self) {}
}

/// What the load stage needs from board bring-up.
pub struct Resources {
    pub params: BootParams,
    pub boot_device: BootDevice,
    pub boot_mode: MmcMode,
    /// The SPL malloc area placed by the linker script.
    pub malloc: Range<*mut u32>,
}

/// Prepare the board for the load stage.
///
/// Call this first. Panics if the boot stage can't continue.
pub fn prepare() -> Resources {
    // Safety: bring-up owns all registers until the load stage starts.
    let mut bus = unsafe { Mmio::steal() };
    let params = match board_init_f(&mut bus, &mut Loader, &InitConfig::DEFAULT) {
        Ok(params) => params,
        Err(err) => {
            log::error!("{err}");
            panic!("{err}");
        }
    };
    let boot_device = spl_boot_device(&bus, &params);
    Resources {
        params,
        boot_device,
        boot_mode: spl_boot_mode(boot_device),
        malloc: heap_start()..heap_end(),
    }
}
