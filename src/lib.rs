//! Loadout - equipment compatibility and stat calculation for RPG characters
//!
//! Checks whether a character may equip an item, sums equipment bonuses into
//! final stats, compares and recommends gear, and migrates saved equipment
//! layouts between schema versions.

pub mod items;
pub mod stats;
pub mod compat;
pub mod compare;
pub mod save;
pub mod data;
pub mod config;
pub mod engine;

// Re-export commonly used types
pub use compat::{check_compatibility, CompatibilityCache, CompatibilityResult, PlayerContext};
pub use compare::{compare_items, optimize_loadout, recommend_upgrades};
pub use config::EngineConfig;
pub use engine::LoadoutEngine;
pub use items::{EquipSlot, EquippedSet, Item, ItemSlot, Rarity};
pub use stats::{calculate_stats, StatName, Stats};
