//! AM625 target support.
//!
//! Provides the volatile register bus and the symbols placed by the
//! generated linker script. The reset vector, stack setup, and BSS clearing
//! belong to the surrounding loader. By the time it calls
//! [`board_init_f`](crate::board_init_f), the ROM boot-info page must still be
//! intact; the generated memory map keeps it out of every section unless the
//! build asked otherwise.

use core::{ffi::c_void, ptr};

use crate::mmio::Bus;

/// Memory-mapped register access.
pub struct Mmio(());

impl Mmio {
    /// Acquire the register bus.
    ///
    /// # Safety
    ///
    /// Addresses passed to the bus are dereferenced as-is. Callers must only
    /// use valid, 4-byte aligned register or RAM addresses.
    pub const unsafe fn steal() -> Self {
        Mmio(())
    }
}

impl Bus for Mmio {
    #[inline]
    fn read32(&self, addr: u32) -> u32 {
        // Safety: see Mmio::steal.
        unsafe { ptr::read_volatile(addr as usize as *const u32) }
    }
    #[inline]
    fn write32(&mut self, addr: u32, value: u32) {
        // Safety: see Mmio::steal.
        unsafe { ptr::write_volatile(addr as usize as *mut u32, value) }
    }
}

extern "C" {
    static mut __sheap: c_void;
    static mut __eheap: c_void;
}

/// Returns a pointer to the start of the SPL malloc area.
///
/// The returned pointer is guaranteed to be 8-byte aligned.
#[inline]
pub fn heap_start() -> *mut u32 {
    unsafe { ptr::addr_of_mut!(__sheap) as _ }
}

/// Returns a pointer to the end of the SPL malloc area.
///
/// The returned pointer is guaranteed to be 8-byte aligned.
#[inline]
pub fn heap_end() -> *mut u32 {
    unsafe { ptr::addr_of_mut!(__eheap) as _ }
}
