//! Upgrade recommendations and greedy loadout optimization
//!
//! Each slot is judged on its own. Only blocking incompatibility filters a
//! candidate out, so an optimized set may pair a two-handed weapon with a
//! shield; the resulting warning travels with the recommendation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::comparator::{Comparator, ComparisonResult, UpgradeTier};
use crate::compat::{CompatibilityChecker, PlayerContext};
use crate::items::{EquipSlot, EquippedSet, Item, ItemId};
use crate::stats::{calculate_stats, Stats};

/// How urgently a recommendation should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_tier(tier: UpgradeTier) -> Self {
        match tier {
            UpgradeTier::StrongUpgrade => Priority::High,
            UpgradeTier::MinorUpgrade => Priority::Medium,
            _ => Priority::Low,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Best upgrade found for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub slot: EquipSlot,
    pub item: Item,
    /// What the item would replace
    pub replaces: Option<Item>,
    pub comparison: ComparisonResult,
    pub priority: Priority,
    /// Non-blocking warnings from the compatibility check
    pub warnings: Vec<String>,
}

/// Result of [`Optimizer::optimize`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedLoadout {
    pub equipped: EquippedSet,
    /// Applied swaps, in slot order
    pub changes: Vec<Recommendation>,
    /// Sum of final stats after minus before
    pub stat_gain: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Optimizer {
    checker: CompatibilityChecker,
    comparator: Comparator,
}

impl Optimizer {
    pub fn new(checker: CompatibilityChecker, comparator: Comparator) -> Self {
        Self { checker, comparator }
    }

    /// Best candidate for `slot`, if any candidate is an upgrade
    fn best_for_slot(
        &self,
        slot: EquipSlot,
        player: &PlayerContext,
        equipped: &EquippedSet,
        candidates: &[Item],
        base: &Stats,
        excluded: &HashSet<ItemId>,
    ) -> Option<Recommendation> {
        let current = equipped.get(slot);
        let mut best: Option<Recommendation> = None;

        for candidate in candidates {
            if excluded.contains(&candidate.id) || current.is_some_and(|c| c.id == candidate.id) {
                continue;
            }
            let verdict = self.checker.check(Some(candidate), Some(slot), player, Some(equipped));
            if !verdict.can_equip() {
                continue;
            }
            let comparison = self.comparator.compare(current, candidate, base);
            if !comparison.is_upgrade {
                continue;
            }
            let better = best
                .as_ref()
                .map_or(true, |b| comparison.total_change > b.comparison.total_change);
            if better {
                best = Some(Recommendation {
                    slot,
                    item: candidate.clone(),
                    replaces: current.cloned(),
                    priority: Priority::from_tier(comparison.tier),
                    comparison,
                    warnings: verdict.warnings().to_vec(),
                });
            }
        }
        best
    }

    /// One recommendation per slot that has an upgrade, most urgent first
    pub fn recommend(
        &self,
        player: &PlayerContext,
        equipped: &EquippedSet,
        candidates: &[Item],
        base: &Stats,
    ) -> Vec<Recommendation> {
        let excluded = HashSet::new();
        let mut recommendations: Vec<Recommendation> = EquipSlot::all()
            .iter()
            .filter_map(|slot| {
                self.best_for_slot(*slot, player, equipped, candidates, base, &excluded)
            })
            .collect();

        recommendations.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.comparison.total_change.cmp(&a.comparison.total_change))
        });
        recommendations
    }

    /// Greedily apply the best upgrade in every slot.
    ///
    /// An item is never placed in two slots.
    pub fn optimize(
        &self,
        player: &PlayerContext,
        equipped: &EquippedSet,
        candidates: &[Item],
        base: &Stats,
    ) -> OptimizedLoadout {
        let mut optimized = equipped.clone();
        let mut used: HashSet<ItemId> = equipped.iter().map(|(_, item)| item.id.clone()).collect();
        let mut changes = Vec::new();

        for slot in EquipSlot::all() {
            let pick = self.best_for_slot(*slot, player, &optimized, candidates, base, &used);
            let Some(pick) = pick else {
                continue;
            };
            log::debug!(
                "Optimizer: {} -> {} ({:+})",
                slot.key(),
                pick.item.id,
                pick.comparison.total_change
            );
            used.insert(pick.item.id.clone());
            optimized.equip(*slot, pick.item.clone());
            changes.push(pick);
        }

        let before = calculate_stats(equipped, base).final_stats.total();
        let after = calculate_stats(&optimized, base).final_stats.total();

        OptimizedLoadout {
            equipped: optimized,
            changes,
            stat_gain: after.saturating_sub(before),
        }
    }
}

/// Recommendations with default rules
pub fn recommend_upgrades(
    player: &PlayerContext,
    equipped: &EquippedSet,
    candidates: &[Item],
    base: &Stats,
) -> Vec<Recommendation> {
    Optimizer::default().recommend(player, equipped, candidates, base)
}

/// Optimization with default rules
pub fn optimize_loadout(
    player: &PlayerContext,
    equipped: &EquippedSet,
    candidates: &[Item],
    base: &Stats,
) -> OptimizedLoadout {
    Optimizer::default().optimize(player, equipped, candidates, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemSlot, Requirements};

    fn make_test_item(id: &str, slot: ItemSlot, mods: &[(&str, i32)]) -> Item {
        mods.iter().fold(Item::new(id, id, Some(slot)), |item, (name, value)| {
            item.with_modifier(*name, *value)
        })
    }

    fn weapon(id: &str, attack: i32) -> Item {
        make_test_item(id, ItemSlot::Slot(EquipSlot::Weapon), &[("attack", attack)])
    }

    fn player() -> PlayerContext {
        PlayerContext::new(10, "warrior", Stats::player_base())
    }

    #[test]
    fn test_picks_best_compatible_upgrade() {
        let mut equipped = EquippedSet::new();
        equipped.equip(EquipSlot::Weapon, weapon("rusty", 2));

        let locked = weapon("legend", 50).with_requirements(Requirements {
            min_level: Some(60),
            ..Requirements::default()
        });
        let candidates = vec![weapon("dagger", 4), weapon("sword", 9), locked, weapon("stick", 1)];

        let recs = recommend_upgrades(&player(), &equipped, &candidates, &Stats::player_base());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].item.id, "sword");
        assert_eq!(recs[0].replaces.as_ref().map(|i| i.id.as_str()), Some("rusty"));
        assert_eq!(recs[0].comparison.total_change, 7);
        assert_eq!(recs[0].priority, Priority::Medium);
    }

    #[test]
    fn test_no_recommendation_without_upgrade() {
        let mut equipped = EquippedSet::new();
        equipped.equip(EquipSlot::Weapon, weapon("good", 10));
        let candidates = vec![weapon("same", 10), weapon("worse", 3)];
        let recs = recommend_upgrades(&player(), &equipped, &candidates, &Stats::player_base());
        assert!(recs.is_empty());
    }

    #[test]
    fn test_sorted_by_priority_then_gain() {
        let candidates = vec![
            make_test_item("cap", ItemSlot::Slot(EquipSlot::Helmet), &[("defense", 4)]),
            make_test_item("boots", ItemSlot::Slot(EquipSlot::Boots), &[("speed", 1)]),
            weapon("axe", 12),
            make_test_item("plate", ItemSlot::Slot(EquipSlot::Armor), &[("defense", 20)]),
            make_test_item("mitts", ItemSlot::Slot(EquipSlot::Gloves), &[("defense", 6)]),
        ];
        let recs =
            recommend_upgrades(&player(), &EquippedSet::new(), &candidates, &Stats::player_base());
        let order: Vec<&str> = recs.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(order, ["plate", "axe", "mitts", "cap", "boots"]);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[4].priority, Priority::Low);
    }

    #[test]
    fn test_optimize_fills_slots_and_reports_gain() {
        let mut equipped = EquippedSet::new();
        equipped.equip(EquipSlot::Weapon, weapon("rusty", 2));
        let candidates = vec![
            weapon("sword", 9),
            make_test_item("cap", ItemSlot::Slot(EquipSlot::Helmet), &[("defense", 4)]),
        ];
        let result = optimize_loadout(&player(), &equipped, &candidates, &Stats::player_base());
        assert_eq!(result.equipped.get(EquipSlot::Weapon).map(|i| i.id.as_str()), Some("sword"));
        assert_eq!(result.equipped.get(EquipSlot::Helmet).map(|i| i.id.as_str()), Some("cap"));
        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.stat_gain, 11);
    }

    #[test]
    fn test_optimize_never_uses_ring_twice() {
        let band = make_test_item("band", ItemSlot::Ring, &[("luck", 0), ("magic", 5)]);
        let result =
            optimize_loadout(&player(), &EquippedSet::new(), &[band], &Stats::player_base());
        assert_eq!(result.equipped.get(EquipSlot::Ring1).map(|i| i.id.as_str()), Some("band"));
        assert!(result.equipped.is_empty(EquipSlot::Ring2));
    }

    #[test]
    fn test_optimize_allows_two_handed_with_shield() {
        let mut equipped = EquippedSet::new();
        equipped.equip(
            EquipSlot::Shield,
            make_test_item("kite", ItemSlot::Slot(EquipSlot::Shield), &[("defense", 3)]),
        );
        let greatsword = weapon("greatsword", 15).two_handed();
        let result = optimize_loadout(&player(), &equipped, &[greatsword], &Stats::player_base());

        assert!(result.equipped.has_two_handed_conflict());
        assert_eq!(result.changes.len(), 1);
        assert!(!result.changes[0].warnings.is_empty());
    }

    #[test]
    fn test_stat_gain_saturates() {
        let mut equipped = EquippedSet::new();
        equipped.equip(EquipSlot::Weapon, weapon("cursed", -2_000_000_000));
        let blessed = weapon("blessed", 2_000_000_000);

        let result = optimize_loadout(&player(), &equipped, &[blessed], &Stats::player_base());
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.stat_gain, i32::MAX);
    }
}
