//! Item comparison
//!
//! Signed per-stat deltas between what is worn and a candidate, rolled up into
//! an upgrade tier.

use serde::{Deserialize, Serialize};

use crate::items::Item;
use crate::stats::{StatName, Stats};

/// How much better or worse a candidate is overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeTier {
    StrongUpgrade,
    MinorUpgrade,
    NoChange,
    MinorDowngrade,
    StrongDowngrade,
}

impl UpgradeTier {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeTier::StrongUpgrade => "Strong upgrade",
            UpgradeTier::MinorUpgrade => "Minor upgrade",
            UpgradeTier::NoChange => "No significant change",
            UpgradeTier::MinorDowngrade => "Minor downgrade",
            UpgradeTier::StrongDowngrade => "Strong downgrade",
        }
    }
}

/// Thresholds used when comparing items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonThresholds {
    /// A stat change this large (absolute) is significant
    pub significant_abs: i32,
    /// A stat change at least this fraction of the base value is significant
    pub significant_pct: f32,
    /// Total change for a strong upgrade/downgrade
    pub strong: i32,
    /// Total change for a minor upgrade/downgrade
    pub minor: i32,
}

impl Default for ComparisonThresholds {
    fn default() -> Self {
        Self {
            significant_abs: 2,
            significant_pct: 0.05,
            strong: 10,
            minor: 3,
        }
    }
}

/// Change in one stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDelta {
    pub stat: StatName,
    pub current: i32,
    pub new: i32,
    pub change: i32,
    pub significant: bool,
}

/// Outcome of comparing a candidate against the worn item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// One entry per stat, in stat order
    pub deltas: Vec<StatDelta>,
    pub total_change: i32,
    /// Strictly positive total change
    pub is_upgrade: bool,
    pub tier: UpgradeTier,
}

impl ComparisonResult {
    pub fn significant_changes(&self) -> impl Iterator<Item = &StatDelta> {
        self.deltas.iter().filter(|d| d.significant)
    }

    pub fn delta(&self, stat: StatName) -> i32 {
        self.deltas
            .iter()
            .find(|d| d.stat == stat)
            .map(|d| d.change)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Comparator {
    thresholds: ComparisonThresholds,
}

impl Comparator {
    pub fn new(thresholds: ComparisonThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ComparisonThresholds {
        &self.thresholds
    }

    /// Compare `new` against `current` (an empty slot counts as all zeroes)
    pub fn compare(&self, current: Option<&Item>, new: &Item, base: &Stats) -> ComparisonResult {
        let current_mods = current.map(Item::stat_modifiers).unwrap_or_default();
        let new_mods = new.stat_modifiers();

        let deltas: Vec<StatDelta> = StatName::ALL
            .iter()
            .map(|&stat| {
                let current = current_mods.get(stat);
                let new = new_mods.get(stat);
                let change = new.saturating_sub(current);
                StatDelta {
                    stat,
                    current,
                    new,
                    change,
                    significant: self.is_significant(change, base.get(stat)),
                }
            })
            .collect();

        let total_change = deltas.iter().fold(0i32, |acc, d| acc.saturating_add(d.change));

        ComparisonResult {
            deltas,
            total_change,
            is_upgrade: total_change > 0,
            tier: self.tier(total_change),
        }
    }

    fn is_significant(&self, change: i32, base: i32) -> bool {
        if change == 0 {
            return false;
        }
        let magnitude = change.saturating_abs();
        magnitude >= self.thresholds.significant_abs
            || magnitude as f32 >= base.saturating_abs() as f32 * self.thresholds.significant_pct
    }

    pub fn tier(&self, total_change: i32) -> UpgradeTier {
        let t = &self.thresholds;
        if total_change >= t.strong {
            UpgradeTier::StrongUpgrade
        } else if total_change >= t.minor {
            UpgradeTier::MinorUpgrade
        } else if total_change <= -t.strong {
            UpgradeTier::StrongDowngrade
        } else if total_change <= -t.minor {
            UpgradeTier::MinorDowngrade
        } else {
            UpgradeTier::NoChange
        }
    }
}

/// Compare with default thresholds
pub fn compare_items(current: Option<&Item>, new: &Item, base: &Stats) -> ComparisonResult {
    Comparator::default().compare(current, new, base)
}
