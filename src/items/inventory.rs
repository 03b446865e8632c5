//! Inventory system
//!
//! Unequipped items the player carries, plus the equip/unequip actions that
//! move items between the inventory and the equipped set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::equipment::EquippedSet;
use super::item::{EquipSlot, Item, ItemId};
use crate::compat::{CompatibilityCache, PlayerContext};

/// Player inventory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    /// Create a new inventory
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Get current number of items
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item to inventory
    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove an item by ID
    pub fn remove_by_id(&mut self, id: &str) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Get item by ID
    pub fn get_by_id(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Get all items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item ids in carry order
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

/// Why an equip action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    #[error("item '{0}' is not in the inventory")]
    NotInInventory(ItemId),
    #[error("cannot equip '{item}': {}", .reasons.join("; "))]
    Incompatible { item: ItemId, reasons: Vec<String> },
    #[error("nothing equipped in the {0} slot")]
    SlotEmpty(EquipSlot),
}

/// Outcome of a successful equip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipOutcome {
    pub slot: EquipSlot,
    /// Item sent back to the inventory, if the slot was occupied
    pub returned: Option<ItemId>,
    /// Non-blocking warnings raised by the check
    pub warnings: Vec<String>,
}

/// Move an item from the inventory into a slot.
///
/// The move only happens when the compatibility check has no blocking
/// reasons. Whatever was in the slot goes back to the inventory.
pub fn equip_from_inventory(
    inventory: &mut Inventory,
    equipped: &mut EquippedSet,
    item_id: &str,
    target: EquipSlot,
    player: &PlayerContext,
    cache: &mut CompatibilityCache,
) -> Result<EquipOutcome, EquipError> {
    let item = inventory
        .get_by_id(item_id)
        .ok_or_else(|| EquipError::NotInInventory(item_id.to_string()))?;

    let verdict = cache.check(Some(item), Some(target), player, Some(&*equipped));
    if !verdict.can_equip() {
        return Err(EquipError::Incompatible {
            item: item_id.to_string(),
            reasons: verdict.reasons().to_vec(),
        });
    }

    let item = inventory
        .remove_by_id(item_id)
        .ok_or_else(|| EquipError::NotInInventory(item_id.to_string()))?;
    let returned = equipped.equip(target, item).map(|previous| {
        let id = previous.id.clone();
        inventory.add_item(previous);
        id
    });

    log::info!("Equipped {} in {} slot", item_id, target.key());
    Ok(EquipOutcome {
        slot: target,
        returned,
        warnings: verdict.warnings().to_vec(),
    })
}

/// Move an equipped item back to the inventory
pub fn unequip_to_inventory(
    inventory: &mut Inventory,
    equipped: &mut EquippedSet,
    slot: EquipSlot,
) -> Result<ItemId, EquipError> {
    let item = equipped.unequip(slot).ok_or(EquipError::SlotEmpty(slot))?;
    let id = item.id.clone();
    inventory.add_item(item);
    Ok(id)
}
