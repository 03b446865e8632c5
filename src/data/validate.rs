//! Item data validation
//!
//! The aggregator and checker silently skip fields they do not understand.
//! This pass is where such data-quality problems get reported instead.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::ItemCatalog;
use crate::items::{EquipSlot, Item, ItemId, ItemSlot};
use crate::stats::StatName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single data-quality finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub item_id: ItemId,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}: {}", tag, self.item_id, self.message)
    }
}

/// Findings from a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn push(&mut self, item: &Item, severity: Severity, message: String) {
        self.issues.push(ValidationIssue {
            item_id: item.id.clone(),
            severity,
            message,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }
}

/// Check one item definition
pub fn validate_item(item: &Item) -> ValidationReport {
    let mut report = ValidationReport::default();

    if item.id.trim().is_empty() {
        report.push(item, Severity::Error, "item id is empty".to_string());
    }

    for name in item.modifiers.keys() {
        if StatName::parse(name).is_none() {
            report.push(item, Severity::Warning, format!("unknown stat modifier '{}'", name));
        }
    }

    if item.required_level.is_some() {
        report.push(item, Severity::Warning, "uses legacy field 'required_level'".to_string());
    }
    if !item.class_restriction.is_empty() {
        report.push(item, Severity::Warning, "uses legacy field 'class_restriction'".to_string());
    }

    if let Some(req) = &item.requirements {
        if item.required_level.is_some() && req.min_level.is_some() {
            report.push(
                item,
                Severity::Warning,
                "both 'required_level' and 'requirements.min_level' set; the legacy field wins"
                    .to_string(),
            );
        }
        if !item.class_restriction.is_empty() && !req.allowed_classes.is_empty() {
            report.push(
                item,
                Severity::Warning,
                concat!(
                    "both 'class_restriction' and 'requirements.allowed_classes' set; ",
                    "the legacy field wins"
                )
                .to_string(),
            );
        }
        for (name, value) in &req.min_stats {
            if StatName::parse(name).is_none() {
                let message = format!("unknown stat requirement '{}'", name);
                report.push(item, Severity::Warning, message);
            }
            if *value < 0 {
                report.push(item, Severity::Error, format!("negative requirement for '{}'", name));
            }
        }
    }

    if item.required_level() == Some(0) {
        report.push(item, Severity::Error, "level requirement of 0".to_string());
    }

    if item.allowed_classes().iter().any(|c| c.trim().is_empty()) {
        report.push(item, Severity::Error, "empty class name in class list".to_string());
    }

    let weapon_slot = matches!(item.slot, None | Some(ItemSlot::Slot(EquipSlot::Weapon)));
    if item.two_handed && !weapon_slot {
        report.push(item, Severity::Warning, "two-handed flag on a non-weapon item".to_string());
    }

    report
}

/// Check every item plus catalog-wide rules (unique ids)
pub fn validate_catalog(catalog: &ItemCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen = HashSet::new();

    for item in &catalog.items {
        if !seen.insert(item.id.as_str()) {
            report.push(item, Severity::Error, "duplicate item id".to_string());
        }
        report.merge(validate_item(item));
    }
    report
}
