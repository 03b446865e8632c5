//! Item catalog
//!
//! Item definitions keyed by id. Save files only store ids, so the catalog is
//! what turns a persisted layout back into real items, and what the schema
//! migrator asks when it needs to know what a legacy accessory was.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::loader::{load_catalog, DataError};
use crate::items::{EquipSlot, EquippedSet, Inventory, Item, ItemId, ItemSlot, Rarity, Requirements};
use crate::save::PersistedEquipment;

/// Item metadata lookup by id
pub trait ItemLookup {
    fn find(&self, id: &str) -> Option<&Item>;
}

impl ItemLookup for HashMap<ItemId, Item> {
    fn find(&self, id: &str) -> Option<&Item> {
        self.get(id)
    }
}

impl ItemLookup for BTreeMap<ItemId, Item> {
    fn find(&self, id: &str) -> Option<&Item> {
        self.get(id)
    }
}

/// All known item definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}

impl ItemLookup for ItemCatalog {
    fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl ItemCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, DataError> {
        load_catalog(path)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build the equipped set for a persisted layout.
    ///
    /// Ids missing from the catalog leave their slot empty.
    pub fn resolve_equipment(&self, persisted: &PersistedEquipment) -> EquippedSet {
        let mut equipped = EquippedSet::new();
        for slot in EquipSlot::all() {
            let Some(id) = persisted.get(*slot) else {
                continue;
            };
            match self.find(id) {
                Some(item) => {
                    equipped.equip(*slot, item.clone());
                }
                None => {
                    log::warn!("Unknown item '{}' in {} slot, leaving it empty", id, slot.key())
                }
            }
        }
        equipped
    }

    /// Build an inventory from item ids, skipping unknown ids
    pub fn resolve_inventory(&self, ids: &[ItemId]) -> Inventory {
        let mut inventory = Inventory::new();
        for id in ids {
            match self.find(id) {
                Some(item) => inventory.add_item(item.clone()),
                None => log::warn!("Unknown inventory item '{}', dropping it", id),
            }
        }
        inventory
    }
}

fn slot(slot: EquipSlot) -> Option<ItemSlot> {
    Some(ItemSlot::Slot(slot))
}

/// Built-in items used when no catalog file is available
pub fn default_catalog() -> ItemCatalog {
    let mut greatsword = Item::new("greatsword", "Greatsword", slot(EquipSlot::Weapon))
        .with_rarity(Rarity::Rare)
        .with_subtype("sword")
        .with_modifier("attack", 14)
        .with_modifier("speed", -2)
        .two_handed();
    greatsword.requirements = Some(Requirements {
        min_level: Some(5),
        allowed_classes: vec!["warrior".into(), "paladin".into()],
        min_stats: BTreeMap::from([("strength".to_string(), 14)]),
    });

    let arcane_staff = Item::new("arcane_staff", "Arcane Staff", slot(EquipSlot::Weapon))
        .with_rarity(Rarity::Epic)
        .with_subtype("staff")
        .with_modifier("magic", 12)
        .with_modifier("mana", 15)
        .two_handed()
        .with_requirements(Requirements {
            min_level: Some(8),
            allowed_classes: vec!["mage".into()],
            min_stats: BTreeMap::from([("intelligence".to_string(), 16)]),
        });

    ItemCatalog::new(vec![
        Item::new("iron_sword", "Iron Sword", slot(EquipSlot::Weapon))
            .with_subtype("sword")
            .with_modifier("attack", 5),
        greatsword,
        arcane_staff,
        Item::new("steel_armor", "Steel Armor", slot(EquipSlot::Armor))
            .with_rarity(Rarity::Uncommon)
            .with_modifier("defense", 8)
            .with_modifier("speed", -1),
        Item::new("leather_cap", "Leather Cap", slot(EquipSlot::Helmet))
            .with_modifier("defense", 2),
        Item::new("oak_shield", "Oak Shield", slot(EquipSlot::Shield))
            .with_modifier("defense", 5)
            .with_modifier("health", 10),
        Item::new("wool_gloves", "Wool Gloves", slot(EquipSlot::Gloves))
            .with_modifier("defense", 1)
            .with_modifier("dexterity", 1),
        Item::new("traveler_boots", "Traveler's Boots", slot(EquipSlot::Boots))
            .with_modifier("speed", 3),
        Item::new("silver_necklace", "Silver Necklace", slot(EquipSlot::Necklace))
            .with_rarity(Rarity::Uncommon)
            .with_subtype("necklace")
            .with_modifier("mana", 10),
        Item::new("bronze_ring", "Bronze Ring", Some(ItemSlot::Ring))
            .with_subtype("ring")
            .with_modifier("accuracy", 2)
            .with_modifier("attack", 1),
        Item::new("ruby_ring", "Ruby Ring", Some(ItemSlot::Ring))
            .with_rarity(Rarity::Rare)
            .with_subtype("ring")
            .with_modifier("health", 10)
            .with_modifier("magic", 4),
        Item::new("lucky_charm", "Lucky Charm", slot(EquipSlot::Charm))
            .with_subtype("charm")
            .with_modifier("accuracy", 3),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_ids_unique() {
        let catalog = default_catalog();
        let mut ids: Vec<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog.find("bronze_ring").is_some());
        assert!(catalog.find("mithril_crown").is_none());
    }

    #[test]
    fn test_resolve_equipment_skips_unknown_ids() {
        let catalog = default_catalog();
        let mut persisted = PersistedEquipment::default();
        persisted.set(EquipSlot::Weapon, Some("iron_sword".into()));
        persisted.set(EquipSlot::Ring2, Some("bronze_ring".into()));
        persisted.set(EquipSlot::Helmet, Some("mithril_crown".into()));

        let equipped = catalog.resolve_equipment(&persisted);
        assert_eq!(equipped.count(), 2);
        assert_eq!(equipped.get(EquipSlot::Ring2).map(|i| i.name.as_str()), Some("Bronze Ring"));
        assert!(equipped.is_empty(EquipSlot::Helmet));
    }

    #[test]
    fn test_resolve_inventory() {
        let catalog = default_catalog();
        let ids = vec!["oak_shield".to_string(), "nope".to_string(), "ruby_ring".to_string()];
        let inventory = catalog.resolve_inventory(&ids);
        assert_eq!(inventory.item_ids(), vec!["oak_shield".to_string(), "ruby_ring".to_string()]);
    }

    #[test]
    fn test_map_lookup() {
        let mut map = HashMap::new();
        map.insert("x".to_string(), Item::new("x", "X", None));
        assert_eq!(map.find("x").map(|i| i.name.as_str()), Some("X"));
        assert!(map.find("y").is_none());
    }
}
