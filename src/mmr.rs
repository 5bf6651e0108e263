//! Control MMR write-protection.
//!
//! Each control MMR module is split into 16 KiB partitions. A partition stays
//! read-only until software writes two kick values to its lock registers.

use crate::{mmio::Bus, soc};

/// KICK0 offset within a partition.
pub const LOCK_KICK0: u32 = 0x1008;
/// KICK1 offset within a partition.
pub const LOCK_KICK1: u32 = 0x100C;
/// Value that opens KICK0.
pub const LOCK_KICK0_UNLOCK_VAL: u32 = 0x68EF_3490;
/// Value that opens KICK1.
pub const LOCK_KICK1_UNLOCK_VAL: u32 = 0xD172_BC5A;

/// One lockable partition of a control MMR module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmrPartition {
    /// Module base address.
    pub base: u32,
    /// Partition number within the module.
    pub index: u32,
}

impl MmrPartition {
    const fn new(base: u32, index: u32) -> Self {
        Self { base, index }
    }

    /// Physical address of the partition.
    pub const fn address(self) -> u32 {
        self.base + self.index * soc::CTRL_MMR_PARTITION_SIZE
    }
}

/// Every partition the AM625 SPL needs writable, in unlock order.
pub const AM625_MMR_PARTITIONS: [MmrPartition; 21] = [
    // WKUP_CTRL_MMR0
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 0),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 1),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 2),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 3),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 4),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 5),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 6),
    MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 7),
    // CTRL_MMR0
    MmrPartition::new(soc::CTRL_MMR0_BASE, 0),
    MmrPartition::new(soc::CTRL_MMR0_BASE, 1),
    MmrPartition::new(soc::CTRL_MMR0_BASE, 2),
    MmrPartition::new(soc::CTRL_MMR0_BASE, 4),
    MmrPartition::new(soc::CTRL_MMR0_BASE, 6),
    // MCU_CTRL_MMR0
    MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 0),
    MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 1),
    MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 2),
    MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 3),
    MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 4),
    MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 6),
    // Padconf registers
    MmrPartition::new(soc::PADCFG_MMR0_BASE, 1),
    MmrPartition::new(soc::PADCFG_MMR1_BASE, 1),
];

/// Unlock one partition with the two-step kick sequence.
pub fn mmr_unlock(bus: &mut impl Bus, partition: MmrPartition) {
    let base = partition.address();
    bus.write32(base + LOCK_KICK0, LOCK_KICK0_UNLOCK_VAL);
    bus.write32(base + LOCK_KICK1, LOCK_KICK1_UNLOCK_VAL);
}

/// Unlock every partition in `partitions`, in order.
pub fn unlock_all(bus: &mut impl Bus, partitions: &[MmrPartition]) {
    for partition in partitions {
        mmr_unlock(bus, *partition);
    }
}

/// Unlock all AM625 control MMR partitions used by the SPL.
pub fn ctrl_mmr_unlock(bus: &mut impl Bus) {
    unlock_all(bus, &AM625_MMR_PARTITIONS);
    log::info!("unlocked {} control MMR partitions", AM625_MMR_PARTITIONS.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::fake::FakeBus;

    #[test]
    fn kick_sequence() {
        let mut bus = FakeBus::default();
        mmr_unlock(&mut bus, MmrPartition::new(soc::CTRL_MMR0_BASE, 2));
        assert_eq!(
            bus.writes,
            [
                (0x0010_9008, LOCK_KICK0_UNLOCK_VAL),
                (0x0010_900C, LOCK_KICK1_UNLOCK_VAL),
            ]
        );
    }

    #[test]
    fn unlocks_in_listed_order() {
        let mut bus = FakeBus::default();
        ctrl_mmr_unlock(&mut bus);

        assert_eq!(bus.writes.len(), 2 * AM625_MMR_PARTITIONS.len());
        for (pair, partition) in bus.writes.chunks(2).zip(AM625_MMR_PARTITIONS) {
            let base = partition.address();
            assert_eq!(
                pair,
                [
                    (base + LOCK_KICK0, LOCK_KICK0_UNLOCK_VAL),
                    (base + LOCK_KICK1, LOCK_KICK1_UNLOCK_VAL),
                ],
                "{partition:?}"
            );
        }
        assert!(bus.reads.borrow().is_empty());
    }

    #[test]
    fn partition_addresses() {
        const TABLE: &[(MmrPartition, u32)] = &[
            (MmrPartition::new(soc::WKUP_CTRL_MMR0_BASE, 7), 0x4301_C000),
            (MmrPartition::new(soc::CTRL_MMR0_BASE, 6), 0x0011_8000),
            (MmrPartition::new(soc::MCU_CTRL_MMR0_BASE, 0), 0x0450_0000),
            (MmrPartition::new(soc::PADCFG_MMR0_BASE, 1), 0x0408_4000),
            (MmrPartition::new(soc::PADCFG_MMR1_BASE, 1), 0x000F_4000),
        ];
        for (partition, expected) in TABLE {
            assert_eq!(partition.address(), *expected, "{partition:?}");
        }
    }

    #[test]
    fn skipped_partitions_stay_locked() {
        let listed = |base, index| {
            AM625_MMR_PARTITIONS
                .iter()
                .any(|p| p.base == base && p.index == index)
        };
        assert!(!listed(soc::CTRL_MMR0_BASE, 3));
        assert!(!listed(soc::CTRL_MMR0_BASE, 5));
        assert!(!listed(soc::MCU_CTRL_MMR0_BASE, 5));
        assert!(!listed(soc::PADCFG_MMR0_BASE, 0));
    }
}
