//! Player-facing compatibility messages
//!
//! Every reason, warning and suggestion string is built here so wording stays
//! consistent between the checker, the UI and tests.

use crate::items::{EquipSlot, ItemSlot, Rarity};
use crate::stats::StatName;

pub const NO_ITEM: &str = "No item selected";
pub const NO_SLOT: &str = "No equipment slot specified";

pub fn slot_mismatch(item_slot: ItemSlot, target: EquipSlot) -> String {
    format!(
        "This item goes in the {} slot, not the {} slot",
        item_slot.key(),
        target.key()
    )
}

pub fn level_too_low(required: u32, current: u32) -> String {
    format!("Requires level {} (you are level {})", required, current)
}

pub fn class_restricted(allowed: &[String]) -> String {
    format!("Only {} can equip this item", join_classes(allowed))
}

pub fn stat_too_low(stat: StatName, required: i32, current: i32) -> String {
    format!("Requires {} {} (you have {})", required, stat.key(), current)
}

pub fn two_handed_conflicts_with_shield(shield: &str) -> String {
    format!(
        "Two-handed weapons leave no hand free for your {}. Consider unequipping {} first",
        shield, shield
    )
}

pub fn shield_conflicts_with_two_handed(weapon: &str) -> String {
    format!(
        "Your {} is two-handed and leaves no hand free for a shield. Consider unequipping {} first",
        weapon, weapon
    )
}

pub fn rarity_above_level(rarity: Rarity, recommended_level: u32) -> String {
    format!(
        "This {} item is meant for level {}+ characters and may be hard to make use of yet",
        rarity.name(),
        recommended_level
    )
}

pub fn rarity_outclassed(rarity: Rarity) -> String {
    format!("This {} item is likely outclassed at your level", rarity.name())
}

pub fn suggest_level_up(levels: u32) -> String {
    format!("Gain {} more {} to use this item", levels, plural(levels, "level", "levels"))
}

pub fn suggest_train_stat(stat: StatName, missing: i32) -> String {
    format!("Raise your {} by {} to meet this item's requirements", stat.key(), missing)
}

pub fn suggest_class_gear(class: &str) -> String {
    format!("Look for gear that {} can use instead", pluralize_class(class))
}

pub fn suggest_build(stat: StatName) -> String {
    format!("Great for a {} build", archetype(stat))
}

/// Build archetype an item's strongest stat points at
pub fn archetype(stat: StatName) -> &'static str {
    match stat {
        StatName::Attack | StatName::Strength => "melee damage",
        StatName::Defense | StatName::Health => "tank",
        StatName::Magic | StatName::Mana | StatName::Intelligence => "spellcaster",
        StatName::Speed | StatName::Accuracy | StatName::Dexterity => "agility",
    }
}

/// Human-readable class list: "Warriors", "Warriors and Mages",
/// "Warriors, Mages, and Rogues".
pub fn join_classes(classes: &[String]) -> String {
    let names: Vec<String> = classes.iter().map(|c| pluralize_class(c)).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

fn pluralize_class(class: &str) -> String {
    let class = class.trim();
    let mut chars = class.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{}s", capitalized)
}

fn plural<'a>(n: u32, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
