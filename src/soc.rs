//! AM625 physical addresses used during SPL bring-up.
//!
//! Values come from the AM62x technical reference manual. Both the target
//! code and the host-side linker script generator consume them, so keep them
//! free of any target-only types.

/// WKUP_CTRL_MMR0 module base.
pub const WKUP_CTRL_MMR0_BASE: u32 = 0x4300_0000;
/// MAIN CTRL_MMR0 module base.
pub const CTRL_MMR0_BASE: u32 = 0x0010_0000;
/// MCU_CTRL_MMR0 module base.
pub const MCU_CTRL_MMR0_BASE: u32 = 0x0450_0000;
/// PADCFG_CTRL_MMR0 (MCU / WKUP pads).
pub const PADCFG_MMR0_BASE: u32 = 0x0408_0000;
/// PADCFG_CTRL_MMR1 (MAIN pads).
pub const PADCFG_MMR1_BASE: u32 = 0x000F_0000;

/// Size of one lockable control MMR partition.
pub const CTRL_MMR_PARTITION_SIZE: u32 = 0x4000;

/// `CTRLMMR_MAIN_DEVSTAT`, the latched boot-mode pins.
pub const CTRLMMR_MAIN_DEVSTAT: u32 = CTRL_MMR0_BASE + 0x30;

/// Where ROM leaves the index of the boot parameter table it used.
pub const BOOT_PARAM_TABLE_INDEX: u32 = 0x43C3_F290;
/// Where ROM leaves its extended boot data record.
pub const ROM_EXTENDED_BOOT_DATA_INFO: u32 = 0x43C3_F1E0;

/// On-chip SRAM that the R5 SPL executes from.
pub const SRAM_START: u32 = 0x43C0_0000;
/// Size of [`SRAM_START`], in bytes.
pub const SRAM_SIZE: u32 = 256 * 1024;

/// Page at the top of SRAM holding ROM's boot information.
///
/// Covers both [`BOOT_PARAM_TABLE_INDEX`] and [`ROM_EXTENDED_BOOT_DATA_INFO`].
pub const ROM_BOOT_INFO_START: u32 = 0x43C3_F000;
/// Size of [`ROM_BOOT_INFO_START`], in bytes.
pub const ROM_BOOT_INFO_SIZE: u32 = SRAM_START + SRAM_SIZE - ROM_BOOT_INFO_START;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rom_boot_info_covers_rom_handoff() {
        let page = ROM_BOOT_INFO_START..ROM_BOOT_INFO_START + ROM_BOOT_INFO_SIZE;
        assert!(page.contains(&BOOT_PARAM_TABLE_INDEX));
        assert!(page.contains(&ROM_EXTENDED_BOOT_DATA_INFO));
        assert_eq!(ROM_BOOT_INFO_SIZE, 0x1000);
    }
}
