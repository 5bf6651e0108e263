//! Register bus abstraction.
//!
//! Every register access in this crate goes through [`Bus`]. On hardware that's
//! the volatile [`Mmio`](crate::Mmio) bus. Host tests substitute a recording fake.

/// 32-bit access to physical addresses.
pub trait Bus {
    /// Read the word at `addr`.
    fn read32(&self, addr: u32) -> u32;
    /// Write `value` to the word at `addr`.
    fn write32(&mut self, addr: u32, value: u32);
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn read32(&self, addr: u32) -> u32 {
        (**self).read32(addr)
    }
    fn write32(&mut self, addr: u32, value: u32) {
        (**self).write32(addr, value)
    }
}
