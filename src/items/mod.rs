//! Item system

pub mod item;
pub mod inventory;
pub mod equipment;

pub use item::{EquipSlot, Item, ItemId, ItemSlot, Rarity, Requirements};
pub use inventory::{
    equip_from_inventory, unequip_to_inventory, EquipError, EquipOutcome, Inventory,
};
pub use equipment::EquippedSet;
