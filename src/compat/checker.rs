//! Equip compatibility rules
//!
//! Decides whether an item may be worn in a slot. Blocking problems go in
//! `reasons`; everything else is advice that never stops the equip.

use serde::{Deserialize, Serialize};

use super::messages;
use crate::items::{EquipSlot, EquippedSet, Item};
use crate::stats::Stats;

/// The character trying to equip something
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerContext {
    pub level: u32,
    /// Compared case-insensitively
    pub class: String,
    /// Current stats, used for stat requirements
    pub stats: Stats,
}

impl PlayerContext {
    pub fn new(level: u32, class: impl Into<String>, stats: Stats) -> Self {
        Self {
            level,
            class: class.into(),
            stats,
        }
    }
}

/// Verdict for one item/slot pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    can_equip: bool,
    reasons: Vec<String>,
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl CompatibilityResult {
    /// `can_equip` is derived from `reasons`
    pub fn new(reasons: Vec<String>, warnings: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            can_equip: reasons.is_empty(),
            reasons,
            warnings,
            suggestions,
        }
    }

    fn blocked(reason: impl Into<String>) -> Self {
        Self::new(vec![reason.into()], Vec::new(), Vec::new())
    }

    pub fn can_equip(&self) -> bool {
        self.can_equip
    }

    /// Blocking problems
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Soft rarity-vs-level guidance thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RarityGuidance {
    /// Warn when an Epic+ item's recommended level is at least this far above the player
    pub high_rarity_level_gap: u32,
    /// Warn when the player is at least this far above a Common item's recommended level
    pub outclassed_level_gap: u32,
}

impl Default for RarityGuidance {
    fn default() -> Self {
        Self {
            high_rarity_level_gap: 10,
            outclassed_level_gap: 15,
        }
    }
}

/// The compatibility rule evaluator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompatibilityChecker {
    guidance: RarityGuidance,
}

impl CompatibilityChecker {
    pub fn new(guidance: RarityGuidance) -> Self {
        Self { guidance }
    }

    pub fn guidance(&self) -> &RarityGuidance {
        &self.guidance
    }

    /// Check whether `item` can go in `target`.
    ///
    /// Missing inputs produce an ordinary blocked result. A slot mismatch
    /// yields a single reason and skips every other rule.
    pub fn check(
        &self,
        item: Option<&Item>,
        target: Option<EquipSlot>,
        player: &PlayerContext,
        equipped: Option<&EquippedSet>,
    ) -> CompatibilityResult {
        let Some(item) = item else {
            return CompatibilityResult::blocked(messages::NO_ITEM);
        };
        let Some(target) = target else {
            return CompatibilityResult::blocked(messages::NO_SLOT);
        };

        if let Some(declared) = item.slot {
            if !declared.fits(target) {
                return CompatibilityResult::blocked(messages::slot_mismatch(declared, target));
            }
        }

        let mut reasons = Vec::new();
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();

        if let Some(required) = item.required_level() {
            if player.level < required {
                reasons.push(messages::level_too_low(required, player.level));
                suggestions.push(messages::suggest_level_up(required - player.level));
            }
        }

        let allowed = item.allowed_classes();
        if !allowed.is_empty() {
            let class = player.class.trim();
            let permitted = allowed.iter().any(|c| c.trim().eq_ignore_ascii_case(class));
            if !permitted {
                reasons.push(messages::class_restricted(allowed));
                suggestions.push(messages::suggest_class_gear(class));
            }
        }

        for (stat, required) in item.stat_requirements() {
            let current = player.stats.get(stat);
            if current < required {
                reasons.push(messages::stat_too_low(stat, required, current));
                let missing = required.saturating_sub(current);
                suggestions.push(messages::suggest_train_stat(stat, missing));
            }
        }

        if let Some(equipped) = equipped {
            if let Some(warning) = hand_conflict(item, target, equipped) {
                warnings.push(warning);
            }
        }

        warnings.extend(self.rarity_warning(item, player.level));

        if let Some((stat, _)) = item.dominant_stat() {
            suggestions.push(messages::suggest_build(stat));
        }

        CompatibilityResult::new(reasons, warnings, suggestions)
    }

    fn rarity_warning(&self, item: &Item, level: u32) -> Option<String> {
        let recommended = item.rarity.recommended_level();
        if item.rarity.is_high_tier()
            && recommended >= level.saturating_add(self.guidance.high_rarity_level_gap)
        {
            return Some(messages::rarity_above_level(item.rarity, recommended));
        }
        if item.rarity.sort_value() == 0
            && level >= recommended.saturating_add(self.guidance.outclassed_level_gap)
        {
            return Some(messages::rarity_outclassed(item.rarity));
        }
        None
    }
}

/// Two-handed weapon / shield clash against what is currently worn
fn hand_conflict(item: &Item, target: EquipSlot, equipped: &EquippedSet) -> Option<String> {
    match target {
        EquipSlot::Weapon if item.two_handed => equipped
            .get(EquipSlot::Shield)
            .map(|shield| messages::two_handed_conflicts_with_shield(&shield.name)),
        EquipSlot::Shield => equipped
            .two_handed_weapon()
            .map(|weapon| messages::shield_conflicts_with_two_handed(&weapon.name)),
        _ => None,
    }
}

/// Check with default guidance thresholds
pub fn check_compatibility(
    item: Option<&Item>,
    target: Option<EquipSlot>,
    player: &PlayerContext,
    equipped: Option<&EquippedSet>,
) -> CompatibilityResult {
    CompatibilityChecker::default().check(item, target, player, equipped)
}
