//! Equipment schema migration
//!
//! Version 1 saves had three slots: `weapon`, `armor` and a catch-all
//! `accessory`. Version 2 has ten concrete slots. The deprecated `accessory`
//! key is still written (always null) for readers that have not moved on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::ItemLookup;
use crate::items::{EquipSlot, EquippedSet, ItemId, ItemSlot};

/// Three-slot weapon/armor/accessory layout
pub const LEGACY_EQUIPMENT_VERSION: u32 = 1;
/// Ten-slot layout
pub const EQUIPMENT_SCHEMA_VERSION: u32 = 2;

/// Equipment map as read from disk: key -> item id or null
pub type RawEquipment = BTreeMap<String, Option<ItemId>>;

const LEGACY_ACCESSORY_KEY: &str = "accessory";

/// Keys only the ten-slot layout has
const CURRENT_ONLY_KEYS: [&str; 8] = [
    "helmet", "shield", "gloves", "boots", "necklace", "ring1", "ring2", "charm",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("equipment schema version {found} is newer than supported version {current}")]
    UnsupportedVersion { found: u32, current: u32 },
}

/// Current-version persisted equipment: item ids per slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEquipment {
    pub weapon: Option<ItemId>,
    pub armor: Option<ItemId>,
    pub helmet: Option<ItemId>,
    pub shield: Option<ItemId>,
    pub gloves: Option<ItemId>,
    pub boots: Option<ItemId>,
    pub necklace: Option<ItemId>,
    pub ring1: Option<ItemId>,
    pub ring2: Option<ItemId>,
    pub charm: Option<ItemId>,
    /// Deprecated, always `None` after migration
    #[serde(default)]
    pub accessory: Option<ItemId>,
}

impl PersistedEquipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&ItemId> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::Helmet => self.helmet.as_ref(),
            EquipSlot::Shield => self.shield.as_ref(),
            EquipSlot::Gloves => self.gloves.as_ref(),
            EquipSlot::Boots => self.boots.as_ref(),
            EquipSlot::Necklace => self.necklace.as_ref(),
            EquipSlot::Ring1 => self.ring1.as_ref(),
            EquipSlot::Ring2 => self.ring2.as_ref(),
            EquipSlot::Charm => self.charm.as_ref(),
        }
    }

    pub fn set(&mut self, slot: EquipSlot, id: Option<ItemId>) {
        let field = match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::Helmet => &mut self.helmet,
            EquipSlot::Shield => &mut self.shield,
            EquipSlot::Gloves => &mut self.gloves,
            EquipSlot::Boots => &mut self.boots,
            EquipSlot::Necklace => &mut self.necklace,
            EquipSlot::Ring1 => &mut self.ring1,
            EquipSlot::Ring2 => &mut self.ring2,
            EquipSlot::Charm => &mut self.charm,
        };
        *field = id;
    }

    /// Snapshot of what is equipped, for saving
    pub fn from_equipped(equipped: &EquippedSet) -> Self {
        let mut persisted = Self::default();
        for (slot, item) in equipped.iter() {
            persisted.set(slot, Some(item.id.clone()));
        }
        persisted
    }

    /// Number of filled slots
    pub fn count(&self) -> usize {
        EquipSlot::all().iter().filter(|s| self.get(**s).is_some()).count()
    }
}

/// Weapon/armor/accessory without any ten-slot key
pub fn is_legacy_shape(raw: &RawEquipment) -> bool {
    let has_legacy = ["weapon", "armor", LEGACY_ACCESSORY_KEY]
        .iter()
        .any(|key| raw.contains_key(*key));
    has_legacy && !has_current_keys(raw)
}

fn has_current_keys(raw: &RawEquipment) -> bool {
    CURRENT_ONLY_KEYS.iter().any(|key| raw.contains_key(*key))
}

/// Upgrade a persisted equipment map to the current layout.
///
/// With `declared_version` set, it decides the path. Without it
/// [`is_legacy_shape`] decides.
/// `lookup` resolves what a legacy accessory was; when it is missing or does
/// not know the item, the accessory lands in the necklace slot.
pub fn migrate(
    raw: &RawEquipment,
    declared_version: Option<u32>,
    lookup: Option<&dyn ItemLookup>,
) -> Result<PersistedEquipment, MigrationError> {
    let legacy = match declared_version {
        Some(v) if v > EQUIPMENT_SCHEMA_VERSION => {
            return Err(MigrationError::UnsupportedVersion {
                found: v,
                current: EQUIPMENT_SCHEMA_VERSION,
            })
        }
        Some(v) => v < EQUIPMENT_SCHEMA_VERSION,
        None => is_legacy_shape(raw),
    };

    if legacy {
        Ok(migrate_legacy(raw, lookup))
    } else {
        Ok(normalize_current(raw))
    }
}

/// Read an id, treating blank strings as empty
fn raw_id(raw: &RawEquipment, key: &str) -> Option<ItemId> {
    raw.get(key)
        .and_then(|id| id.as_ref())
        .filter(|id| !id.trim().is_empty())
        .cloned()
}

fn normalize_current(raw: &RawEquipment) -> PersistedEquipment {
    if let Some(id) = raw_id(raw, LEGACY_ACCESSORY_KEY) {
        log::warn!("Dropping '{}' from deprecated accessory slot in ten-slot layout", id);
    }
    let mut out = PersistedEquipment::default();
    for slot in EquipSlot::all() {
        out.set(*slot, raw_id(raw, slot.key()));
    }
    out
}

fn migrate_legacy(raw: &RawEquipment, lookup: Option<&dyn ItemLookup>) -> PersistedEquipment {
    let mut out = PersistedEquipment {
        weapon: raw_id(raw, "weapon"),
        armor: raw_id(raw, "armor"),
        ..PersistedEquipment::default()
    };

    if let Some(id) = raw_id(raw, LEGACY_ACCESSORY_KEY) {
        let slot = accessory_slot(&id, lookup);
        log::info!("Migrated legacy accessory '{}' to {} slot", id, slot.key());
        out.set(slot, Some(id));
    }
    out
}

/// Concrete slot for a legacy accessory
fn accessory_slot(id: &str, lookup: Option<&dyn ItemLookup>) -> EquipSlot {
    let Some(item) = lookup.and_then(|l| l.find(id)) else {
        log::warn!("No metadata for legacy accessory '{}', defaulting to necklace", id);
        return EquipSlot::Necklace;
    };

    if let Some(subtype) = item.subtype.as_deref() {
        let subtype = subtype.trim().to_ascii_lowercase();
        return match subtype.as_str() {
            "ring" => EquipSlot::Ring1,
            _ => EquipSlot::Necklace,
        };
    }

    match item.slot {
        Some(ItemSlot::Ring)
        | Some(ItemSlot::Slot(EquipSlot::Ring1))
        | Some(ItemSlot::Slot(EquipSlot::Ring2)) => EquipSlot::Ring1,
        _ => EquipSlot::Necklace,
    }
}
