//! Stat aggregation
//!
//! Turns base stats plus an equipped set into final character stats.

use serde::{Deserialize, Serialize};

use super::stat::{StatName, Stats, ACCURACY_MAX, ACCURACY_MIN};
use crate::items::{EquipSlot, EquippedSet, Item};

/// What one equipped item adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatContribution {
    pub slot: EquipSlot,
    pub item: Item,
    /// Recognized modifiers of the item
    pub stats: Stats,
    /// Sum of absolute modifier values
    pub total: i32,
}

/// Result of [`calculate_stats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCalculationResult {
    pub base: Stats,
    /// Summed equipment modifiers per stat
    pub bonuses: Stats,
    /// Base + bonuses, accuracy clamped
    pub final_stats: Stats,
    /// One entry per occupied slot, in slot order
    pub breakdown: Vec<StatContribution>,
}

impl StatCalculationResult {
    /// Bonus granted by equipment for a stat
    pub fn bonus(&self, stat: StatName) -> i32 {
        self.bonuses.get(stat)
    }
}

/// Calculate final stats for an equipped set.
///
/// Unknown modifier names are skipped. Accuracy is the only stat with bounds.
pub fn calculate_stats(equipped: &EquippedSet, base: &Stats) -> StatCalculationResult {
    let mut bonuses = Stats::zero();
    let mut breakdown = Vec::with_capacity(equipped.count());

    for slot in EquipSlot::all() {
        let Some(item) = equipped.get(*slot) else {
            continue;
        };
        let mods = item.stat_modifiers();
        for (stat, value) in mods.iter() {
            bonuses.add(stat, value);
        }
        breakdown.push(StatContribution {
            slot: *slot,
            item: item.clone(),
            stats: mods,
            total: mods.total_abs(),
        });
    }

    let mut final_stats = *base;
    for (stat, value) in bonuses.iter() {
        final_stats.add(stat, value);
    }
    final_stats.accuracy = final_stats.accuracy.clamp(ACCURACY_MIN, ACCURACY_MAX);

    StatCalculationResult {
        base: *base,
        bonuses,
        final_stats,
        breakdown,
    }
}
