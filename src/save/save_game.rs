//! Save/load of a character's equipment state
//!
//! Equipment is migrated to the current schema on every load, before anything
//! else sees it, and the loaded data is stamped with the current version.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::migration::{
    migrate, MigrationError, PersistedEquipment, RawEquipment, EQUIPMENT_SCHEMA_VERSION,
};
use crate::data::ItemLookup;
use crate::items::ItemId;
use crate::stats::Stats;

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = EQUIPMENT_SCHEMA_VERSION;

/// Complete save data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub player: PlayerSaveData,
    pub equipment: PersistedEquipment,
    /// Carried (unequipped) item ids
    #[serde(default)]
    pub inventory: Vec<ItemId>,
}

/// Player-specific save data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSaveData {
    pub level: u32,
    pub class: String,
    /// Stats before equipment
    pub base_stats: Stats,
}

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Invalid save data: {0}")]
    InvalidData(String),
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "loadout", "Loadout") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Get the path for a specific save slot
pub fn save_path(slot: u8) -> PathBuf {
    let mut path = save_directory();
    path.push(format!("save_{}.json", slot));
    path
}

/// Parse a save, migrating its equipment layout.
///
/// `lookup` is handed to the migrator for legacy accessories.
pub fn load_from_str(json: &str, lookup: Option<&dyn ItemLookup>) -> Result<SaveData, SaveError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(mut root) = value else {
        return Err(SaveError::InvalidData("save root must be an object".to_string()));
    };

    let declared_version = match root.get("version") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let version = v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| SaveError::InvalidData(format!("bad version field: {}", v)))?;
            Some(version)
        }
    };

    let raw_equipment: RawEquipment = match root.remove("equipment") {
        None | Some(Value::Null) => RawEquipment::new(),
        Some(v) => serde_json::from_value(v)?,
    };
    let equipment = migrate(&raw_equipment, declared_version, lookup)?;

    let player: PlayerSaveData = root
        .remove("player")
        .map(serde_json::from_value)
        .transpose()?
        .ok_or_else(|| SaveError::InvalidData("missing player".to_string()))?;
    if player.level == 0 {
        return Err(SaveError::InvalidData("player level must be at least 1".to_string()));
    }

    let inventory: Vec<ItemId> = root
        .remove("inventory")
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();

    Ok(SaveData {
        version: SAVE_VERSION,
        player,
        equipment,
        inventory,
    })
}

/// Serialize a save as pretty JSON
pub fn save_to_string(save: &SaveData) -> Result<String, SaveError> {
    Ok(serde_json::to_string_pretty(save)?)
}

/// Write a save file, creating parent directories
pub fn save_to_path(save: &SaveData, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, save_to_string(save)?)?;
    log::info!("Saved equipment to {}", path.display());
    Ok(())
}

/// Read and migrate a save file
pub fn load_from_path(path: &Path, lookup: Option<&dyn ItemLookup>) -> Result<SaveData, SaveError> {
    let data = fs::read_to_string(path)?;
    let save = load_from_str(&data, lookup)?;
    log::info!("Loaded save from {} ({} items equipped)", path.display(), save.equipment.count());
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::default_catalog;
    use crate::items::EquipSlot;

    const LEGACY_SAVE: &str = r#"{
        "player": {
            "level": 4,
            "class": "Warrior",
            "base_stats": { "attack": 10, "accuracy": 80 }
        },
        "equipment": { "weapon": "iron_sword", "armor": "steel_armor", "accessory": "bronze_ring" },
        "inventory": ["oak_shield"]
    }"#;

    #[test]
    fn test_legacy_save_is_migrated_and_stamped() {
        let catalog = default_catalog();
        let save = load_from_str(LEGACY_SAVE, Some(&catalog)).unwrap();
        assert_eq!(save.version, SAVE_VERSION);
        assert_eq!(save.equipment.get(EquipSlot::Ring1).map(|s| s.as_str()), Some("bronze_ring"));
        assert_eq!(save.equipment.accessory, None);
        assert_eq!(save.player.base_stats.attack, 10);
        assert_eq!(save.player.base_stats.health, 0);
        assert_eq!(save.inventory, vec!["oak_shield".to_string()]);
    }

    #[test]
    fn test_round_trip_current_save() {
        let catalog = default_catalog();
        let save = load_from_str(LEGACY_SAVE, Some(&catalog)).unwrap();
        let json = save_to_string(&save).unwrap();
        let reloaded = load_from_str(&json, None).unwrap();
        assert_eq!(reloaded, save);
    }

    #[test]
    fn test_corrupted_saves_error() {
        assert!(matches!(load_from_str("{ not json", None), Err(SaveError::Parse(_))));
        assert!(matches!(load_from_str("[1, 2]", None), Err(SaveError::InvalidData(_))));
        assert!(matches!(
            load_from_str(r#"{ "version": "two", "player": {} }"#, None),
            Err(SaveError::InvalidData(_))
        ));
        assert!(matches!(
            load_from_str(r#"{ "version": 2, "equipment": { "weapon": 7 } }"#, None),
            Err(SaveError::Parse(_))
        ));
        assert!(matches!(
            load_from_str(r#"{ "version": 99, "equipment": {} }"#, None),
            Err(SaveError::Migration(_))
        ));
        assert!(matches!(
            load_from_str(r#"{ "version": 2, "equipment": {} }"#, None),
            Err(SaveError::InvalidData(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("loadout-save-test-{}", std::process::id()));
        let path = dir.join("slot.json");
        let catalog = default_catalog();
        let save = load_from_str(LEGACY_SAVE, Some(&catalog)).unwrap();

        save_to_path(&save, &path).unwrap();
        let loaded = load_from_path(&path, Some(&catalog)).unwrap();
        assert_eq!(loaded, save);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_path_in_saves_dir() {
        let path = save_path(2);
        assert!(path.ends_with("saves/save_2.json"));
    }
}
