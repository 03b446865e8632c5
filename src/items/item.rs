//! Item definitions
//!
//! Core item types, rarities, slots and equip requirements.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::stats::{StatName, Stats};

/// Unique item ID (catalog key, also what save files store)
pub type ItemId = String;

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Get rarity name
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }

    /// Get numeric value for sorting (higher = rarer)
    pub fn sort_value(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Character level this rarity is balanced around
    pub fn recommended_level(&self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 5,
            Rarity::Rare => 10,
            Rarity::Epic => 20,
            Rarity::Legendary => 30,
        }
    }

    /// Epic and above
    pub fn is_high_tier(&self) -> bool {
        *self >= Rarity::Epic
    }
}

/// Concrete equipment slot on a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Helmet,
    Shield,
    Gloves,
    Boots,
    Necklace,
    Ring1,
    Ring2,
    Charm,
}

impl EquipSlot {
    /// Lowercase key used in data files and messages
    pub fn key(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
            EquipSlot::Helmet => "helmet",
            EquipSlot::Shield => "shield",
            EquipSlot::Gloves => "gloves",
            EquipSlot::Boots => "boots",
            EquipSlot::Necklace => "necklace",
            EquipSlot::Ring1 => "ring1",
            EquipSlot::Ring2 => "ring2",
            EquipSlot::Charm => "charm",
        }
    }

    /// Either of the two ring slots
    pub fn is_ring(&self) -> bool {
        matches!(self, EquipSlot::Ring1 | EquipSlot::Ring2)
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EquipSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EquipSlot::all()
            .iter()
            .copied()
            .find(|slot| slot.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown equipment slot '{}'", s))
    }
}

/// Slot an item declares it belongs in.
///
/// `Ring` is generic: it fits either ring slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemSlot {
    Ring,
    Slot(EquipSlot),
}

impl ItemSlot {
    pub fn key(&self) -> &'static str {
        match self {
            ItemSlot::Ring => "ring",
            ItemSlot::Slot(slot) => slot.key(),
        }
    }

    /// Whether an item declaring this slot can go in `target`
    pub fn fits(&self, target: EquipSlot) -> bool {
        match self {
            ItemSlot::Ring => target.is_ring(),
            ItemSlot::Slot(slot) => *slot == target,
        }
    }

    /// Concrete slots this declaration can occupy
    pub fn targets(&self) -> Vec<EquipSlot> {
        match self {
            ItemSlot::Ring => vec![EquipSlot::Ring1, EquipSlot::Ring2],
            ItemSlot::Slot(slot) => vec![*slot],
        }
    }
}

impl fmt::Display for ItemSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ItemSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ring") {
            Ok(ItemSlot::Ring)
        } else {
            s.parse().map(ItemSlot::Slot)
        }
    }
}

impl TryFrom<String> for ItemSlot {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemSlot> for String {
    fn from(slot: ItemSlot) -> Self {
        slot.key().to_string()
    }
}

impl From<EquipSlot> for ItemSlot {
    fn from(slot: EquipSlot) -> Self {
        ItemSlot::Slot(slot)
    }
}

/// Nested equip requirements
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub min_level: Option<u32>,
    pub allowed_classes: Vec<String>,
    /// Stat name -> minimum value. Unknown stat names are ignored by the checker.
    pub min_stats: BTreeMap<String, i32>,
}

/// A wearable item.
///
/// Items are compared by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub rarity: Rarity,
    /// `None` means the item fits any slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<ItemSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default)]
    pub two_handed: bool,
    /// Stat name -> signed modifier
    #[serde(default)]
    pub modifiers: BTreeMap<String, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    /// Legacy flat level requirement, wins over `requirements.min_level`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_level: Option<u32>,
    /// Legacy flat class list, wins over `requirements.allowed_classes`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_restriction: Vec<String>,
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, slot: Option<ItemSlot>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity: Rarity::Common,
            slot,
            subtype: None,
            two_handed: false,
            modifiers: BTreeMap::new(),
            requirements: None,
            required_level: None,
            class_restriction: Vec::new(),
        }
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn with_modifier(mut self, stat: impl Into<String>, value: i32) -> Self {
        self.modifiers.insert(stat.into(), value);
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    /// Effective level requirement
    pub fn required_level(&self) -> Option<u32> {
        self.required_level
            .or_else(|| self.requirements.as_ref().and_then(|r| r.min_level))
    }

    /// Effective class allow-list (empty = any class)
    pub fn allowed_classes(&self) -> &[String] {
        if !self.class_restriction.is_empty() {
            return &self.class_restriction;
        }
        self.requirements
            .as_ref()
            .map(|r| r.allowed_classes.as_slice())
            .unwrap_or(&[])
    }

    /// Recognized stat requirements, in stat order
    pub fn stat_requirements(&self) -> Vec<(StatName, i32)> {
        let Some(requirements) = &self.requirements else {
            return Vec::new();
        };
        let mut out: Vec<(StatName, i32)> = requirements
            .min_stats
            .iter()
            .filter_map(|(name, value)| StatName::parse(name).map(|stat| (stat, *value)))
            .collect();
        out.sort_by_key(|(stat, _)| *stat);
        out
    }

    /// Recognized modifiers summed into a stat block
    pub fn stat_modifiers(&self) -> Stats {
        let mut stats = Stats::zero();
        for (name, value) in &self.modifiers {
            if let Some(stat) = StatName::parse(name) {
                stats.add(stat, *value);
            }
        }
        stats
    }

    /// Modifier for a single stat
    pub fn modifier(&self, stat: StatName) -> i32 {
        self.stat_modifiers().get(stat)
    }

    /// Largest positive modifier, earliest stat wins ties
    pub fn dominant_stat(&self) -> Option<(StatName, i32)> {
        let mods = self.stat_modifiers();
        mods.iter()
            .filter(|(_, v)| *v > 0)
            .fold(None, |best: Option<(StatName, i32)>, (stat, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((stat, v)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_slot_parse_case_insensitive() {
        assert_eq!("RING".parse::<ItemSlot>(), Ok(ItemSlot::Ring));
        assert_eq!("Helmet".parse::<ItemSlot>(), Ok(ItemSlot::Slot(EquipSlot::Helmet)));
        assert_eq!("ring2".parse::<ItemSlot>(), Ok(ItemSlot::Slot(EquipSlot::Ring2)));
        assert!("accessory".parse::<ItemSlot>().is_err());
    }

    #[test]
    fn test_generic_ring_fits_both_ring_slots_only() {
        for slot in EquipSlot::all() {
            assert_eq!(ItemSlot::Ring.fits(*slot), slot.is_ring(), "slot {}", slot);
        }
    }

    #[test]
    fn test_legacy_fields_take_priority() {
        let mut item = Item::new("blade", "Blade", Some(EquipSlot::Weapon.into()))
            .with_requirements(Requirements {
                min_level: Some(5),
                allowed_classes: vec!["mage".into()],
                min_stats: BTreeMap::new(),
            });
        assert_eq!(item.required_level(), Some(5));
        assert_eq!(item.allowed_classes(), ["mage".to_string()]);

        item.required_level = Some(9);
        item.class_restriction = vec!["warrior".into()];
        assert_eq!(item.required_level(), Some(9));
        assert_eq!(item.allowed_classes(), ["warrior".to_string()]);
    }

    #[test]
    fn test_unknown_modifiers_ignored() {
        let item = Item::new("x", "X", None)
            .with_modifier("Attack", 4)
            .with_modifier("fire_resist", 10);
        let mods = item.stat_modifiers();
        assert_eq!(mods.attack, 4);
        assert_eq!(mods.total(), 4);
    }

    #[test]
    fn test_dominant_stat() {
        let item = Item::new("x", "X", None)
            .with_modifier("defense", 6)
            .with_modifier("health", 6)
            .with_modifier("speed", -10);
        assert_eq!(item.dominant_stat(), Some((StatName::Health, 6)));

        let cursed = Item::new("y", "Y", None).with_modifier("speed", -1);
        assert_eq!(cursed.dominant_stat(), None);
    }

    #[test]
    fn test_item_deserializes_from_ron() {
        let src = r#"(
            id: "bronze_ring",
            name: "Bronze Ring",
            rarity: uncommon,
            slot: Some("Ring"),
            subtype: Some("ring"),
            modifiers: { "luck": 1, "accuracy": 2 },
        )"#;
        let item: Item = ron::from_str(src).unwrap();
        assert_eq!(item.slot, Some(ItemSlot::Ring));
        assert_eq!(item.rarity, Rarity::Uncommon);
        assert_eq!(item.modifier(StatName::Accuracy), 2);
        assert!(!item.two_handed);
    }
}
