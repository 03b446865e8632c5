//! Save/load system
//!
//! Handles persisted equipment layouts and their schema migration.

pub mod migration;
pub mod save_game;

pub use migration::{
    is_legacy_shape, migrate, MigrationError, PersistedEquipment, RawEquipment,
    EQUIPMENT_SCHEMA_VERSION, LEGACY_EQUIPMENT_VERSION,
};

pub use save_game::{
    load_from_path, load_from_str, save_directory, save_path, save_to_path, save_to_string,
    PlayerSaveData, SaveData, SaveError, SAVE_VERSION,
};
