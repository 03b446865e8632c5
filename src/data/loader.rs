//! RON data loader
//!
//! Loads the item catalog and engine config from external RON files, with
//! fallback to built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::catalog::{default_catalog, ItemCatalog};
use super::validate::validate_catalog;
use crate::config::EngineConfig;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize data: {0}")]
    Serialize(#[from] ron::Error),
}

fn read(path: &Path) -> Result<String, DataError> {
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an item catalog from a RON file
pub fn load_catalog(path: &Path) -> Result<ItemCatalog, DataError> {
    let content = read(path)?;
    let catalog: ItemCatalog = ron::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let report = validate_catalog(&catalog);
    for issue in &report.issues {
        log::warn!("{}: {}", path.display(), issue);
    }
    log::info!("Loaded {} items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load a catalog, falling back to the built-in items on any failure
pub fn load_catalog_or_default(path: Option<&Path>) -> ItemCatalog {
    let Some(path) = path else {
        return default_catalog();
    };
    load_catalog(path).unwrap_or_else(|e| {
        log::warn!("{}. Using built-in items.", e);
        default_catalog()
    })
}

/// Load engine config from a RON file
pub fn load_config(path: &Path) -> Result<EngineConfig, DataError> {
    let content = read(path)?;
    EngineConfig::from_ron_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config, falling back to defaults on any failure
pub fn load_config_or_default(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    load_config(path).unwrap_or_else(|e| {
        log::warn!("{}. Using default config.", e);
        EngineConfig::default()
    })
}

/// Write a catalog as pretty RON, creating parent directories
pub fn export_catalog(catalog: &ItemCatalog, path: &Path) -> Result<(), DataError> {
    let content = ron::ser::to_string_pretty(catalog, ron::ser::PrettyConfig::default())?;
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ItemLookup;
    use crate::items::{ItemSlot, Rarity};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("loadout-data-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_export_then_load_catalog() {
        let path = temp_path("items.ron");
        export_catalog(&default_catalog(), &path).unwrap();

        let loaded = ItemCatalog::load(&path).unwrap();
        assert_eq!(loaded.len(), default_catalog().len());
        let ring = loaded.find("ruby_ring").unwrap();
        assert_eq!(ring.slot, Some(ItemSlot::Ring));
        assert_eq!(ring.rarity, Rarity::Rare);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = temp_path("does-not-exist.ron");
        assert!(matches!(load_catalog(&path), Err(DataError::Io { .. })));
        assert_eq!(load_catalog_or_default(Some(&path)).len(), default_catalog().len());
        assert_eq!(load_config_or_default(Some(&path)), EngineConfig::default());
        assert_eq!(load_config_or_default(None), EngineConfig::default());
    }

    #[test]
    fn test_bad_ron_is_parse_error() {
        let path = temp_path("broken.ron");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "(items: [ (id: ").unwrap();
        assert!(matches!(load_catalog(&path), Err(DataError::Parse { .. })));
        let _ = fs::remove_file(&path);
    }
}
