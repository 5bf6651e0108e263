//! Boot media selection.
//!
//! ROM latches the boot-mode pins into `CTRLMMR_MAIN_DEVSTAT`. The register
//! carries two independent selections: the primary boot mode and a backup boot
//! mode that ROM falls back to. The boot index in [`BootParams`] says which one
//! ROM actually used. The decoders here translate the raw field encodings
//! into the [`BootDevice`] the load stage understands. Every input decodes;
//! there's no error path.

use tock_registers::{register_bitfields, LocalRegisterCopy};

use crate::{bootparams::BootParams, mmio::Bus, soc};

register_bitfields![u32,
    /// `CTRLMMR_MAIN_DEVSTAT` boot-mode fields.
    pub DEVSTAT [
        PRIMARY_BOOTMODE OFFSET(3) NUMBITS(4) [
            Ospi = 0x1,
            Qspi = 0x2,
            Spi = 0x3,
            EthernetRgmii = 0x4,
            EthernetRmii = 0x5,
            I2c = 0x6,
            Uart = 0x7,
            Mmc = 0x8,
            Emmc = 0x9,
            Usb = 0xA,
            GpmcNand = 0xB,
            GpmcNor = 0xC,
            Pcie = 0xD,
            Xspi = 0xE,
            NoBoot = 0xF
        ],
        PRIMARY_BOOTMODE_CFG OFFSET(7) NUMBITS(3) [],
        BACKUP_BOOTMODE OFFSET(10) NUMBITS(3) [
            Usb = 0x1,
            Uart = 0x3,
            Ethernet = 0x4,
            Mmc = 0x5,
            Spi = 0x6,
            I2c = 0x7
        ],
        BACKUP_BOOTMODE_CFG OFFSET(13) NUMBITS(1) []
    ]
];

/// MMC port selection inside `PRIMARY_BOOTMODE_CFG`.
const PRIMARY_MMC_PORT_MASK: u32 = 0x4;
const PRIMARY_MMC_PORT_SHIFT: u32 = 2;

type Devstat = LocalRegisterCopy<u32, DEVSTAT::Register>;

/// Logical boot device handed to the load stage.
///
/// Each device has a numeric code, see [`code()`](BootDevice::code).
/// [`from_code()`](BootDevice::from_code) only produces
/// [`Other`](BootDevice::Other) for codes with no name; an `Other` holding a
/// named code decodes back to the named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootDevice {
    /// Nothing to load from; the next stage is already in RAM.
    Ram,
    /// Any serial flash: SPI, QSPI, OSPI, xSPI.
    Spi,
    Ethernet,
    I2c,
    Uart,
    /// First MMC controller (eMMC).
    Mmc1,
    /// Second MMC controller (SD card).
    Mmc2,
    /// USB device firmware upgrade.
    Dfu,
    GpmcNand,
    GpmcNor,
    Pcie,
    /// USB host mass storage.
    Usb,
    /// A code with no named variant.
    Other(u32),
}

impl BootDevice {
    /// The device's numeric code.
    pub const fn code(self) -> u32 {
        match self {
            BootDevice::Ram => 0xFF,
            BootDevice::Spi => 0x03,
            BootDevice::Ethernet => 0x04,
            BootDevice::I2c => 0x06,
            BootDevice::Uart => 0x07,
            BootDevice::Mmc2 => 0x08,
            BootDevice::Mmc1 => 0x09,
            BootDevice::Dfu => 0x0A,
            BootDevice::GpmcNand => 0x0B,
            BootDevice::GpmcNor => 0x0C,
            BootDevice::Pcie => 0x0D,
            BootDevice::Usb => 0x2A,
            BootDevice::Other(code) => code,
        }
    }

    /// Look up the device for a numeric code.
    pub const fn from_code(code: u32) -> Self {
        match code {
            0xFF => BootDevice::Ram,
            0x03 => BootDevice::Spi,
            0x04 => BootDevice::Ethernet,
            0x06 => BootDevice::I2c,
            0x07 => BootDevice::Uart,
            0x08 => BootDevice::Mmc2,
            0x09 => BootDevice::Mmc1,
            0x0A => BootDevice::Dfu,
            0x0B => BootDevice::GpmcNand,
            0x0C => BootDevice::GpmcNor,
            0x0D => BootDevice::Pcie,
            0x2A => BootDevice::Usb,
            code => BootDevice::Other(code),
        }
    }
}

/// How the MMC loader should read the next stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmcMode {
    /// Read from the eMMC boot partition.
    EmmcBoot,
    /// Read a file from a filesystem.
    Fs,
    /// Read raw sectors.
    Raw,
}

/// Decode the primary boot mode.
pub fn primary_boot_media(devstat: u32) -> BootDevice {
    use DEVSTAT::PRIMARY_BOOTMODE::Value as Primary;

    let devstat = Devstat::new(devstat);
    match devstat.read_as_enum(DEVSTAT::PRIMARY_BOOTMODE) {
        Some(Primary::Ospi | Primary::Qspi | Primary::Xspi | Primary::Spi) => BootDevice::Spi,
        Some(Primary::EthernetRgmii | Primary::EthernetRmii) => BootDevice::Ethernet,
        Some(Primary::Emmc) => BootDevice::Mmc1,
        Some(Primary::Mmc) => {
            let cfg = devstat.read(DEVSTAT::PRIMARY_BOOTMODE_CFG);
            if (cfg & PRIMARY_MMC_PORT_MASK) >> PRIMARY_MMC_PORT_SHIFT != 0 {
                BootDevice::Mmc2
            } else {
                BootDevice::Mmc1
            }
        }
        Some(Primary::NoBoot) => BootDevice::Ram,
        _ => BootDevice::from_code(devstat.read(DEVSTAT::PRIMARY_BOOTMODE)),
    }
}

/// Decode the backup boot mode.
///
/// Unassigned backup codes select [`BootDevice::Ram`].
pub fn backup_boot_media(devstat: u32) -> BootDevice {
    use DEVSTAT::BACKUP_BOOTMODE::Value as Backup;

    let devstat = Devstat::new(devstat);
    match devstat.read_as_enum(DEVSTAT::BACKUP_BOOTMODE) {
        Some(Backup::Uart) => BootDevice::Uart,
        Some(Backup::Usb) => BootDevice::Usb,
        Some(Backup::Ethernet) => BootDevice::Ethernet,
        Some(Backup::Mmc) => {
            if devstat.is_set(DEVSTAT::BACKUP_BOOTMODE_CFG) {
                BootDevice::Mmc2
            } else {
                BootDevice::Mmc1
            }
        }
        Some(Backup::Spi) => BootDevice::Spi,
        Some(Backup::I2c) => BootDevice::I2c,
        None => BootDevice::Ram,
    }
}

/// Select the boot device for `devstat`, given the boot index ROM used.
pub fn boot_device(devstat: u32, boot_index: u32) -> BootDevice {
    if boot_index == crate::bootparams::PRIMARY_BOOT_INDEX {
        primary_boot_media(devstat)
    } else {
        backup_boot_media(devstat)
    }
}

/// Read `CTRLMMR_MAIN_DEVSTAT` and select the boot device.
pub fn spl_boot_device(bus: &impl Bus, params: &BootParams) -> BootDevice {
    let devstat = bus.read32(soc::CTRLMMR_MAIN_DEVSTAT);
    let bootmedia = boot_device(devstat, params.boot_index);
    log::debug!(
        "devstat = {devstat:#x} bootmedia = {:#x} bootindex = {}",
        bootmedia.code(),
        params.boot_index
    );
    bootmedia
}

/// Select the MMC load mode for `device`.
pub fn spl_boot_mode(device: BootDevice) -> MmcMode {
    match device {
        BootDevice::Mmc1 => MmcMode::EmmcBoot,
        BootDevice::Mmc2 => MmcMode::Fs,
        _ => MmcMode::Raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bootparams::{RomExtendedBootData, PRIMARY_BOOT_INDEX},
        mmio::fake::FakeBus,
    };

    const BACKUP_BOOT_INDEX: u32 = 1;

    const fn primary(mode: u32, cfg: u32) -> u32 {
        (mode << 3) | (cfg << 7)
    }
    const fn backup(mode: u32, cfg: u32) -> u32 {
        (mode << 10) | (cfg << 13)
    }

    /// Every devstat value that changes a boot-mode field.
    fn all_devstats() -> impl Iterator<Item = u32> {
        (0..1 << 11).map(|fields| fields << 3)
    }

    #[test]
    fn primary_table() {
        const TABLE: &[(u32, BootDevice)] = &[
            (0x1, BootDevice::Spi),
            (0x2, BootDevice::Spi),
            (0x3, BootDevice::Spi),
            (0xE, BootDevice::Spi),
            (0x4, BootDevice::Ethernet),
            (0x5, BootDevice::Ethernet),
            (0x6, BootDevice::I2c),
            (0x7, BootDevice::Uart),
            (0x9, BootDevice::Mmc1),
            (0xA, BootDevice::Dfu),
            (0xB, BootDevice::GpmcNand),
            (0xC, BootDevice::GpmcNor),
            (0xD, BootDevice::Pcie),
            (0xF, BootDevice::Ram),
            (0x0, BootDevice::Other(0)),
        ];
        for (mode, expected) in TABLE {
            let actual = primary_boot_media(primary(*mode, 0));
            assert_eq!(actual, *expected, "primary mode {mode:#x}");
        }
    }

    #[test]
    fn primary_spi_family_collapses() {
        for mode in [0x1, 0x2, 0x3, 0xE] {
            for cfg in 0..8 {
                let devstat = primary(mode, cfg);
                assert_eq!(
                    boot_device(devstat, PRIMARY_BOOT_INDEX),
                    BootDevice::Spi,
                    "{devstat:#x}"
                );
            }
        }
    }

    #[test]
    fn primary_mmc_port() {
        for cfg in 0..8 {
            let expected = if cfg & 0b100 != 0 {
                BootDevice::Mmc2
            } else {
                BootDevice::Mmc1
            };
            assert_eq!(primary_boot_media(primary(0x8, cfg)), expected, "cfg {cfg:#05b}");
        }
    }

    #[test]
    fn primary_emmc_is_mmc1() {
        let devstat = primary(0x9, 0);
        assert_eq!(boot_device(devstat, PRIMARY_BOOT_INDEX), BootDevice::Mmc1);
        assert_eq!(spl_boot_mode(BootDevice::Mmc1), MmcMode::EmmcBoot);
    }

    #[test]
    fn primary_noboot_ignores_other_fields() {
        for devstat in all_devstats() {
            let devstat = (devstat & !primary(0xF, 0)) | primary(0xF, 0);
            assert_eq!(primary_boot_media(devstat), BootDevice::Ram, "{devstat:#x}");
        }
    }

    #[test]
    fn primary_passthrough_keeps_code() {
        for mode in [0x0, 0x6, 0x7, 0xA, 0xB, 0xC, 0xD] {
            assert_eq!(primary_boot_media(primary(mode, 0)).code(), mode);
        }
    }

    #[test]
    fn backup_table() {
        const TABLE: &[(u32, BootDevice)] = &[
            (0x0, BootDevice::Ram),
            (0x1, BootDevice::Usb),
            (0x2, BootDevice::Ram),
            (0x3, BootDevice::Uart),
            (0x4, BootDevice::Ethernet),
            (0x5, BootDevice::Mmc1),
            (0x6, BootDevice::Spi),
            (0x7, BootDevice::I2c),
        ];
        for (mode, expected) in TABLE {
            let actual = backup_boot_media(backup(*mode, 0));
            assert_eq!(actual, *expected, "backup mode {mode:#x}");
        }
    }

    #[test]
    fn backup_mmc_cfg_bit() {
        assert_eq!(backup_boot_media(backup(0x5, 0)), BootDevice::Mmc1);
        assert_eq!(backup_boot_media(backup(0x5, 1)), BootDevice::Mmc2);
    }

    #[test]
    fn backup_usb() {
        let devstat = backup(0x1, 0) | primary(0x9, 0);
        assert_eq!(boot_device(devstat, BACKUP_BOOT_INDEX), BootDevice::Usb);
        assert_eq!(boot_device(devstat, 7), BootDevice::Usb);
    }

    #[test]
    fn decode_is_total() {
        const EXPECTED_PRIMARY: &[BootDevice] = &[
            BootDevice::Ram,
            BootDevice::Spi,
            BootDevice::Ethernet,
            BootDevice::I2c,
            BootDevice::Uart,
            BootDevice::Mmc1,
            BootDevice::Mmc2,
            BootDevice::Dfu,
            BootDevice::GpmcNand,
            BootDevice::GpmcNor,
            BootDevice::Pcie,
            BootDevice::Other(0),
        ];
        const EXPECTED_BACKUP: &[BootDevice] = &[
            BootDevice::Ram,
            BootDevice::Spi,
            BootDevice::Ethernet,
            BootDevice::I2c,
            BootDevice::Uart,
            BootDevice::Mmc1,
            BootDevice::Mmc2,
            BootDevice::Usb,
        ];
        for devstat in all_devstats() {
            let p = boot_device(devstat, PRIMARY_BOOT_INDEX);
            assert!(EXPECTED_PRIMARY.contains(&p), "{devstat:#x} -> {p:?}");
            let b = boot_device(devstat, BACKUP_BOOT_INDEX);
            assert!(EXPECTED_BACKUP.contains(&b), "{devstat:#x} -> {b:?}");
        }
    }

    #[test]
    fn unrelated_bits_ignored() {
        const UNRELATED: u32 = !0x3FF8;
        for devstat in all_devstats() {
            for index in [PRIMARY_BOOT_INDEX, BACKUP_BOOT_INDEX] {
                assert_eq!(
                    boot_device(devstat, index),
                    boot_device(devstat | UNRELATED, index),
                    "{devstat:#x} index {index}"
                );
            }
        }
    }

    #[test]
    fn named_codes_round_trip() {
        const NAMED: &[BootDevice] = &[
            BootDevice::Ram,
            BootDevice::Spi,
            BootDevice::Ethernet,
            BootDevice::I2c,
            BootDevice::Uart,
            BootDevice::Mmc1,
            BootDevice::Mmc2,
            BootDevice::Dfu,
            BootDevice::GpmcNand,
            BootDevice::GpmcNor,
            BootDevice::Pcie,
            BootDevice::Usb,
        ];
        for device in NAMED {
            assert_eq!(BootDevice::from_code(device.code()), *device);
        }
        assert_eq!(BootDevice::from_code(0x1F), BootDevice::Other(0x1F));
        assert_eq!(BootDevice::Other(0x1F).code(), 0x1F);
        assert_eq!(BootDevice::from_code(BootDevice::Other(0x03).code()), BootDevice::Spi);
    }

    #[test]
    fn boot_mode() {
        assert_eq!(spl_boot_mode(BootDevice::Mmc1), MmcMode::EmmcBoot);
        assert_eq!(spl_boot_mode(BootDevice::Mmc2), MmcMode::Fs);
        for device in [BootDevice::Spi, BootDevice::Ram, BootDevice::Usb] {
            assert_eq!(spl_boot_mode(device), MmcMode::Raw, "{device:?}");
        }
    }

    #[test]
    fn reads_devstat_register() {
        let bus = FakeBus::with(&[(soc::CTRLMMR_MAIN_DEVSTAT, backup(0x5, 1))]);
        let params = BootParams {
            boot_index: BACKUP_BOOT_INDEX,
            rom_data: RomExtendedBootData::default(),
        };
        assert_eq!(spl_boot_device(&bus, &params), BootDevice::Mmc2);
        assert_eq!(*bus.reads.borrow(), [soc::CTRLMMR_MAIN_DEVSTAT]);
    }
}
