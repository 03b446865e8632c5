//! Memoizing LRU cache in front of the compatibility checker
//!
//! The checker runs on every hover/render tick for every visible inventory
//! item, so results are memoized by a normalized snapshot of the inputs.
//! There is no time-based expiry: call [`CompatibilityCache::clear`] after a
//! level-up, class change or anything else that invalidates many entries.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::checker::{CompatibilityChecker, CompatibilityResult, PlayerContext};
use crate::items::{EquipSlot, EquippedSet, Item, ItemId, ItemSlot, Rarity, Requirements};
use crate::stats::Stats;

/// Default number of memoized results
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Every item field the checker reads
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ItemKey {
    id: ItemId,
    rarity: Rarity,
    slot: Option<ItemSlot>,
    two_handed: bool,
    modifiers: BTreeMap<String, i32>,
    requirements: Option<Requirements>,
    required_level: Option<u32>,
    class_restriction: Vec<String>,
}

impl ItemKey {
    fn new(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            rarity: item.rarity,
            slot: item.slot,
            two_handed: item.two_handed,
            modifiers: item.modifiers.clone(),
            requirements: item.requirements.clone(),
            required_level: item.required_level,
            class_restriction: item.class_restriction.clone(),
        }
    }
}

/// The parts of the equipped set that feed the two-handed/shield warning
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HandsKey {
    weapon: Option<(ItemId, String, bool)>,
    shield: Option<(ItemId, String)>,
}

impl HandsKey {
    fn new(equipped: &EquippedSet) -> Self {
        Self {
            weapon: equipped
                .get(EquipSlot::Weapon)
                .map(|w| (w.id.clone(), w.name.clone(), w.two_handed)),
            shield: equipped
                .get(EquipSlot::Shield)
                .map(|s| (s.id.clone(), s.name.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    item: Option<ItemKey>,
    target: Option<EquipSlot>,
    level: u32,
    class: String,
    stats: Stats,
    hands: Option<HandsKey>,
}

impl CacheKey {
    fn new(
        item: Option<&Item>,
        target: Option<EquipSlot>,
        player: &PlayerContext,
        equipped: Option<&EquippedSet>,
    ) -> Self {
        Self {
            item: item.map(ItemKey::new),
            target,
            level: player.level,
            class: player.class.clone(),
            stats: player.stats,
            hands: equipped.map(HandsKey::new),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    result: Arc<CompatibilityResult>,
    /// Position in the recency index
    tick: u64,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
    /// `hits / (hits + misses)`, 0 before any lookup
    pub hit_rate: f64,
}

/// Fixed-capacity least-recently-used cache of compatibility results
#[derive(Debug)]
pub struct CompatibilityCache {
    checker: CompatibilityChecker,
    capacity: usize,
    entries: HashMap<CacheKey, CacheEntry>,
    /// tick -> key, oldest first
    recency: BTreeMap<u64, CacheKey>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl Default for CompatibilityCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl CompatibilityCache {
    /// Create a cache holding at most `capacity` results (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self::with_checker(capacity, CompatibilityChecker::default())
    }

    pub fn with_checker(capacity: usize, checker: CompatibilityChecker) -> Self {
        Self {
            checker,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    pub fn checker(&self) -> &CompatibilityChecker {
        &self.checker
    }

    /// Memoized [`CompatibilityChecker::check`].
    ///
    /// A hit returns the same shared result the first call produced.
    pub fn check(
        &mut self,
        item: Option<&Item>,
        target: Option<EquipSlot>,
        player: &PlayerContext,
        equipped: Option<&EquippedSet>,
    ) -> Arc<CompatibilityResult> {
        let key = CacheKey::new(item, target, player, equipped);

        if let Some(entry) = self.entries.get_mut(&key) {
            self.hits += 1;
            self.recency.remove(&entry.tick);
            self.tick += 1;
            entry.tick = self.tick;
            let result = Arc::clone(&entry.result);
            self.recency.insert(self.tick, key);
            return result;
        }

        self.misses += 1;
        let result = Arc::new(self.checker.check(item, target, player, equipped));

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.tick += 1;
        self.entries.insert(
            key.clone(),
            CacheEntry {
                result: Arc::clone(&result),
                tick: self.tick,
            },
        );
        self.recency.insert(self.tick, key);
        result
    }

    /// Whether a result is cached for these inputs, without touching recency
    pub fn contains(
        &self,
        item: Option<&Item>,
        target: Option<EquipSlot>,
        player: &PlayerContext,
        equipped: Option<&EquippedSet>,
    ) -> bool {
        self.entries
            .contains_key(&CacheKey::new(item, target, player, equipped))
    }

    fn evict_oldest(&mut self) {
        if let Some((_, key)) = self.recency.pop_first() {
            self.entries.remove(&key);
            log::debug!(
                "Evicted compatibility entry for {:?} -> {:?}",
                key.item.as_ref().map(|i| i.id.as_str()),
                key.target
            );
        }
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        log::debug!(
            "Clearing compatibility cache ({} entries, {} hits, {} misses)",
            self.entries.len(),
            self.hits,
            self.misses
        );
        self.entries.clear();
        self.recency.clear();
        self.tick = 0;
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            capacity: self.capacity,
            hit_rate: self.hit_rate(),
        }
    }
}

/// Thread-safe handle to a [`CompatibilityCache`].
///
/// Promote-on-hit and evict-on-insert both mutate the recency order, so every
/// lookup takes the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedCompatibilityCache {
    inner: Arc<Mutex<CompatibilityCache>>,
}

impl SharedCompatibilityCache {
    pub fn new(cache: CompatibilityCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn check(
        &self,
        item: Option<&Item>,
        target: Option<EquipSlot>,
        player: &PlayerContext,
        equipped: Option<&EquippedSet>,
    ) -> Arc<CompatibilityResult> {
        self.inner.lock().check(item, target, player, equipped)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::checker::check_compatibility;
    use crate::stats::StatName;

    fn player() -> PlayerContext {
        PlayerContext::new(5, "warrior", Stats::player_base())
    }

    fn sword(id: &str) -> Item {
        Item::new(id, id, Some(ItemSlot::Slot(EquipSlot::Weapon))).with_modifier("attack", 3)
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache = CompatibilityCache::new(10);
        let item = sword("a");
        assert_eq!(cache.hit_rate(), 0.0);

        let first = cache.check(Some(&item), Some(EquipSlot::Weapon), &player(), None);
        let second = cache.check(Some(&item), Some(EquipSlot::Weapon), &player(), None);

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn test_cached_equals_fresh() {
        let mut cache = CompatibilityCache::default();
        let mut equipped = EquippedSet::new();
        equipped.equip(
            EquipSlot::Shield,
            Item::new("tower", "Tower Shield", Some(ItemSlot::Slot(EquipSlot::Shield))),
        );
        let item = sword("gs").two_handed();
        let ctx = player();

        cache.check(Some(&item), Some(EquipSlot::Weapon), &ctx, Some(&equipped));
        let cached = cache.check(Some(&item), Some(EquipSlot::Weapon), &ctx, Some(&equipped));
        let fresh =
            check_compatibility(Some(&item), Some(EquipSlot::Weapon), &ctx, Some(&equipped));
        assert_eq!(*cached, fresh);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_any_input_change_misses() {
        let mut cache = CompatibilityCache::default();
        let item = sword("a");
        let ctx = player();
        cache.check(Some(&item), Some(EquipSlot::Weapon), &ctx, None);

        let mut leveled = ctx.clone();
        leveled.level += 1;
        let mut reclassed = ctx.clone();
        reclassed.class = "Warrior".into();
        let mut stronger = ctx.clone();
        stronger.stats.add(StatName::Strength, 1);
        let buffed = sword("a").with_modifier("speed", 1);
        let empty = EquippedSet::new();

        cache.check(Some(&item), Some(EquipSlot::Weapon), &leveled, None);
        cache.check(Some(&item), Some(EquipSlot::Weapon), &reclassed, None);
        cache.check(Some(&item), Some(EquipSlot::Weapon), &stronger, None);
        cache.check(Some(&buffed), Some(EquipSlot::Weapon), &ctx, None);
        cache.check(Some(&item), Some(EquipSlot::Shield), &ctx, None);
        cache.check(Some(&item), Some(EquipSlot::Weapon), &ctx, Some(&empty));
        cache.check(None, Some(EquipSlot::Weapon), &ctx, None);

        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 8);
    }

    #[test]
    fn test_equipped_hands_change_misses() {
        let mut cache = CompatibilityCache::default();
        let ctx = player();
        let greatsword = sword("gs").two_handed();
        let mut equipped = EquippedSet::new();

        let before = cache.check(Some(&greatsword), Some(EquipSlot::Weapon), &ctx, Some(&equipped));
        assert!(before.warnings().is_empty());

        let shield = Item::new("tower", "Tower Shield", Some(ItemSlot::Slot(EquipSlot::Shield)));
        equipped.equip(EquipSlot::Shield, shield.clone());
        let after = cache.check(Some(&greatsword), Some(EquipSlot::Weapon), &ctx, Some(&equipped));
        assert_eq!(cache.stats().misses, 2);
        assert!(after.warnings().iter().any(|w| w.contains("Tower Shield")));

        let mut worn = EquippedSet::new();
        worn.equip(EquipSlot::Weapon, sword("short"));
        let one_handed = cache.check(Some(&shield), Some(EquipSlot::Shield), &ctx, Some(&worn));
        assert!(one_handed.warnings().is_empty());

        worn.equip(EquipSlot::Weapon, sword("maul").two_handed());
        let two_handed = cache.check(Some(&shield), Some(EquipSlot::Shield), &ctx, Some(&worn));
        assert_eq!(cache.stats().misses, 4);
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(two_handed.warnings().len(), 1);
    }

    #[test]
    fn test_modifier_order_does_not_matter() {
        let mut cache = CompatibilityCache::default();
        let a = Item::new("x", "X", None).with_modifier("attack", 1).with_modifier("speed", 2);
        let b = Item::new("x", "X", None).with_modifier("speed", 2).with_modifier("attack", 1);
        cache.check(Some(&a), Some(EquipSlot::Charm), &player(), None);
        cache.check(Some(&b), Some(EquipSlot::Charm), &player(), None);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = CompatibilityCache::new(3);
        let ctx = player();
        let items: Vec<Item> = ["a", "b", "c", "d"].iter().map(|id| sword(id)).collect();

        for item in &items[..3] {
            cache.check(Some(item), Some(EquipSlot::Weapon), &ctx, None);
        }
        // Touch "a" so "b" becomes the oldest
        cache.check(Some(&items[0]), Some(EquipSlot::Weapon), &ctx, None);
        cache.check(Some(&items[3]), Some(EquipSlot::Weapon), &ctx, None);

        assert_eq!(cache.len(), 3);
        assert!(cache.contains(Some(&items[0]), Some(EquipSlot::Weapon), &ctx, None));
        assert!(!cache.contains(Some(&items[1]), Some(EquipSlot::Weapon), &ctx, None));
        assert!(cache.contains(Some(&items[2]), Some(EquipSlot::Weapon), &ctx, None));
        assert!(cache.contains(Some(&items[3]), Some(EquipSlot::Weapon), &ctx, None));
    }

    #[test]
    fn test_capacity_plus_one_evicts_exactly_one() {
        let mut cache = CompatibilityCache::default();
        let ctx = player();
        let items: Vec<Item> =
            (0..=DEFAULT_CACHE_CAPACITY).map(|i| sword(&format!("item{}", i))).collect();
        for item in &items {
            cache.check(Some(item), Some(EquipSlot::Weapon), &ctx, None);
        }
        assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
        assert!(!cache.contains(Some(&items[0]), Some(EquipSlot::Weapon), &ctx, None));
        for item in &items[1..] {
            assert!(cache.contains(Some(item), Some(EquipSlot::Weapon), &ctx, None));
        }
    }

    #[test]
    fn test_clear_resets_entries_and_counters() {
        let mut cache = CompatibilityCache::default();
        let item = sword("a");
        cache.check(Some(&item), Some(EquipSlot::Weapon), &player(), None);
        cache.check(Some(&item), Some(EquipSlot::Weapon), &player(), None);
        cache.clear();

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hit_rate, 0.0);

        cache.check(Some(&item), Some(EquipSlot::Weapon), &player(), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_shared_cache_across_threads() {
        let shared = SharedCompatibilityCache::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = shared.clone();
                std::thread::spawn(move || {
                    let item = sword("a");
                    cache.check(Some(&item), Some(EquipSlot::Weapon), &player(), None);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let stats = shared.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 3);
    }
}
