//! Loadout engine
//!
//! One place that owns the configured checker, cache, comparator and
//! optimizer, so callers don't have to wire them together.

use std::sync::Arc;

use crate::compare::{Comparator, ComparisonResult, OptimizedLoadout, Optimizer, Recommendation};
use crate::compat::{
    CacheStats, CompatibilityCache, CompatibilityChecker, CompatibilityResult, PlayerContext,
};
use crate::config::EngineConfig;
use crate::items::{
    equip_from_inventory, unequip_to_inventory, EquipError, EquipOutcome, EquipSlot, EquippedSet,
    Inventory, Item, ItemId,
};
use crate::stats::{calculate_stats, StatCalculationResult, Stats};

#[derive(Debug)]
pub struct LoadoutEngine {
    config: EngineConfig,
    cache: CompatibilityCache,
    comparator: Comparator,
    optimizer: Optimizer,
}

impl Default for LoadoutEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl LoadoutEngine {
    pub fn new(config: EngineConfig) -> Self {
        let checker = CompatibilityChecker::new(config.guidance);
        let comparator = Comparator::new(config.comparison);
        log::debug!(
            "Loadout engine ready (cache capacity {})",
            config.cache_capacity
        );
        Self {
            cache: CompatibilityCache::with_checker(config.cache_capacity, checker),
            optimizer: Optimizer::new(checker, comparator),
            comparator,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Cached compatibility check
    pub fn check(
        &mut self,
        item: Option<&Item>,
        target: Option<EquipSlot>,
        player: &PlayerContext,
        equipped: Option<&EquippedSet>,
    ) -> Arc<CompatibilityResult> {
        self.cache.check(item, target, player, equipped)
    }

    pub fn stats(&self, equipped: &EquippedSet, base: &Stats) -> StatCalculationResult {
        calculate_stats(equipped, base)
    }

    pub fn compare(&self, current: Option<&Item>, new: &Item, base: &Stats) -> ComparisonResult {
        self.comparator.compare(current, new, base)
    }

    pub fn recommend(
        &self,
        player: &PlayerContext,
        equipped: &EquippedSet,
        candidates: &[Item],
        base: &Stats,
    ) -> Vec<Recommendation> {
        self.optimizer.recommend(player, equipped, candidates, base)
    }

    pub fn optimize(
        &self,
        player: &PlayerContext,
        equipped: &EquippedSet,
        candidates: &[Item],
        base: &Stats,
    ) -> OptimizedLoadout {
        self.optimizer.optimize(player, equipped, candidates, base)
    }

    /// Move an inventory item into a slot, checking through the cache
    pub fn equip(
        &mut self,
        inventory: &mut Inventory,
        equipped: &mut EquippedSet,
        item_id: &str,
        target: EquipSlot,
        player: &PlayerContext,
    ) -> Result<EquipOutcome, EquipError> {
        equip_from_inventory(inventory, equipped, item_id, target, player, &mut self.cache)
    }

    pub fn unequip(
        &mut self,
        inventory: &mut Inventory,
        equipped: &mut EquippedSet,
        slot: EquipSlot,
    ) -> Result<ItemId, EquipError> {
        unequip_to_inventory(inventory, equipped, slot)
    }

    /// Forget every cached result, e.g. after item definitions change
    pub fn reset_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
