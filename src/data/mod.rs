//! Item data: catalog, RON loading and validation

pub mod catalog;
pub mod loader;
pub mod validate;

pub use catalog::{default_catalog, ItemCatalog, ItemLookup};
pub use loader::{
    export_catalog, load_catalog, load_catalog_or_default, load_config, load_config_or_default,
    DataError,
};
pub use validate::{validate_catalog, validate_item, Severity, ValidationIssue, ValidationReport};
