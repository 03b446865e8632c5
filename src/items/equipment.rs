//! Equipment system
//!
//! Holds the items worn in each concrete slot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::{EquipSlot, Item, ItemId};

/// Items worn by a character, at most one per concrete slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquippedSet {
    slots: BTreeMap<EquipSlot, Item>,
}

impl EquippedSet {
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Put an item in a slot, returning the previously equipped item if any.
    ///
    /// No rules are checked here; gate with the compatibility checker first.
    pub fn equip(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        self.slots.insert(slot, item)
    }

    /// Unequip an item from a slot
    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        self.slots.remove(&slot)
    }

    /// Get item in a slot
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        self.slots.get(&slot)
    }

    /// Check if a slot is empty
    pub fn is_empty(&self, slot: EquipSlot) -> bool {
        !self.slots.contains_key(&slot)
    }

    /// Number of occupied slots
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots with their items, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &Item)> {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    /// Slot currently holding the item with this id
    pub fn slot_of(&self, id: &str) -> Option<EquipSlot> {
        self.iter().find(|(_, item)| item.id == id).map(|(slot, _)| slot)
    }

    /// Ids per slot, every slot present
    pub fn item_ids(&self) -> BTreeMap<EquipSlot, Option<ItemId>> {
        EquipSlot::all()
            .iter()
            .map(|slot| (*slot, self.get(*slot).map(|item| item.id.clone())))
            .collect()
    }

    /// Equipped weapon if it is two-handed
    pub fn two_handed_weapon(&self) -> Option<&Item> {
        self.get(EquipSlot::Weapon).filter(|item| item.two_handed)
    }

    /// Two-handed weapon and shield worn together
    pub fn has_two_handed_conflict(&self) -> bool {
        self.two_handed_weapon().is_some() && !self.is_empty(EquipSlot::Shield)
    }
}

/// Equipment slot display info
impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "Weapon",
            EquipSlot::Armor => "Armor",
            EquipSlot::Helmet => "Helmet",
            EquipSlot::Shield => "Shield",
            EquipSlot::Gloves => "Gloves",
            EquipSlot::Boots => "Boots",
            EquipSlot::Necklace => "Necklace",
            EquipSlot::Ring1 => "Ring 1",
            EquipSlot::Ring2 => "Ring 2",
            EquipSlot::Charm => "Charm",
        }
    }

    /// Get all slots in display order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Weapon,
            EquipSlot::Armor,
            EquipSlot::Helmet,
            EquipSlot::Shield,
            EquipSlot::Gloves,
            EquipSlot::Boots,
            EquipSlot::Necklace,
            EquipSlot::Ring1,
            EquipSlot::Ring2,
            EquipSlot::Charm,
        ]
    }
}
