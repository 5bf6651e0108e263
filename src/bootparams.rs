//! Boot information left behind by the ROM bootloader.
//!
//! ROM writes the boot parameter table index and an extended boot data record
//! into the top of SRAM. The SPL malloc area may later overlap that page, so the
//! snapshot has to be taken before anything else runs. [`BootParams::capture`]
//! does that once; the resulting value is handed to every consumer instead of
//! living in a global.

use crate::{mmio::Bus, soc};

/// Boot index recorded by ROM when it booted from the primary boot mode.
pub const PRIMARY_BOOT_INDEX: u32 = 0;

/// Header magic ROM writes when it loaded the companion firmware.
pub const EXTBOOT_MAGIC: &[u8; 7] = b"EXTBOOT";

/// The extended boot data record ROM leaves in SRAM.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RomExtendedBootData {
    /// NUL-padded magic, `"EXTBOOT"` when valid.
    pub header: [u8; 8],
    /// Number of images ROM loaded, including the SPL itself.
    pub num_components: u32,
}

impl RomExtendedBootData {
    /// Copy the record from `addr`.
    ///
    /// The three words are read from `addr`, `addr + 4` and `addr + 8`, wrapping
    /// at the top of the address space.
    pub fn read_from(bus: &impl Bus, addr: u32) -> Self {
        let lo = bus.read32(addr).to_le_bytes();
        let hi = bus.read32(addr.wrapping_add(4)).to_le_bytes();
        let mut header = [0; 8];
        header[..4].copy_from_slice(&lo);
        header[4..].copy_from_slice(&hi);
        Self {
            header,
            num_components: bus.read32(addr.wrapping_add(8)),
        }
    }

    /// Returns `true` if ROM loaded the TIFS firmware alongside the SPL.
    ///
    /// That's the case when the header carries the magic and ROM reports
    /// more than one component.
    pub fn is_sysfw_loaded(&self) -> bool {
        self.header.starts_with(EXTBOOT_MAGIC) && self.num_components > 1
    }
}

/// Snapshot of the ROM handoff, taken once per boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootParams {
    /// Which boot parameter table ROM used; see [`PRIMARY_BOOT_INDEX`].
    pub boot_index: u32,
    /// The extended boot data record.
    pub rom_data: RomExtendedBootData,
}

impl BootParams {
    /// Capture the ROM handoff from its fixed AM625 location.
    pub fn capture(bus: &impl Bus) -> Self {
        Self::capture_from(
            bus,
            soc::BOOT_PARAM_TABLE_INDEX,
            soc::ROM_EXTENDED_BOOT_DATA_INFO,
        )
    }

    /// Capture the ROM handoff from caller-provided addresses.
    pub fn capture_from(bus: &impl Bus, index_addr: u32, data_addr: u32) -> Self {
        Self {
            boot_index: bus.read32(index_addr),
            rom_data: RomExtendedBootData::read_from(bus, data_addr),
        }
    }

    /// Returns `true` if ROM booted from the primary boot mode.
    pub fn is_primary(&self) -> bool {
        self.boot_index == PRIMARY_BOOT_INDEX
    }
}
