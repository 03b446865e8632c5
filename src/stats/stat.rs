//! Stat names and stat blocks
//!
//! Items carry modifiers keyed by free-form stat names; only the names listed
//! in [`StatName`] take part in aggregation and requirement checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest accuracy a character can end up with
pub const ACCURACY_MIN: i32 = 0;
/// Highest accuracy a character can end up with
pub const ACCURACY_MAX: i32 = 100;

/// Recognized character stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Health,
    Mana,
    Attack,
    Defense,
    Magic,
    Speed,
    Accuracy,
    Strength,
    Dexterity,
    Intelligence,
}

impl StatName {
    /// Every recognized stat, in display order
    pub const ALL: [StatName; 10] = [
        StatName::Health,
        StatName::Mana,
        StatName::Attack,
        StatName::Defense,
        StatName::Magic,
        StatName::Speed,
        StatName::Accuracy,
        StatName::Strength,
        StatName::Dexterity,
        StatName::Intelligence,
    ];

    /// Lowercase key used in item data
    pub fn key(&self) -> &'static str {
        match self {
            StatName::Health => "health",
            StatName::Mana => "mana",
            StatName::Attack => "attack",
            StatName::Defense => "defense",
            StatName::Magic => "magic",
            StatName::Speed => "speed",
            StatName::Accuracy => "accuracy",
            StatName::Strength => "strength",
            StatName::Dexterity => "dexterity",
            StatName::Intelligence => "intelligence",
        }
    }

    /// Parse a stat name, ignoring case. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<StatName> {
        let name = name.trim();
        StatName::ALL
            .iter()
            .copied()
            .find(|stat| stat.key().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StatName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatName::parse(s).ok_or_else(|| format!("unknown stat '{}'", s))
    }
}

/// A full set of stat values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub health: i32,
    pub mana: i32,
    pub attack: i32,
    pub defense: i32,
    pub magic: i32,
    pub speed: i32,
    pub accuracy: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub intelligence: i32,
}

impl Stats {
    /// All stats at zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Starting stats for a fresh level 1 character
    pub fn player_base() -> Self {
        Self {
            health: 100,
            mana: 50,
            attack: 10,
            defense: 5,
            magic: 5,
            speed: 10,
            accuracy: 80,
            strength: 10,
            dexterity: 10,
            intelligence: 10,
        }
    }

    pub fn get(&self, stat: StatName) -> i32 {
        match stat {
            StatName::Health => self.health,
            StatName::Mana => self.mana,
            StatName::Attack => self.attack,
            StatName::Defense => self.defense,
            StatName::Magic => self.magic,
            StatName::Speed => self.speed,
            StatName::Accuracy => self.accuracy,
            StatName::Strength => self.strength,
            StatName::Dexterity => self.dexterity,
            StatName::Intelligence => self.intelligence,
        }
    }

    fn slot_mut(&mut self, stat: StatName) -> &mut i32 {
        match stat {
            StatName::Health => &mut self.health,
            StatName::Mana => &mut self.mana,
            StatName::Attack => &mut self.attack,
            StatName::Defense => &mut self.defense,
            StatName::Magic => &mut self.magic,
            StatName::Speed => &mut self.speed,
            StatName::Accuracy => &mut self.accuracy,
            StatName::Strength => &mut self.strength,
            StatName::Dexterity => &mut self.dexterity,
            StatName::Intelligence => &mut self.intelligence,
        }
    }

    pub fn set(&mut self, stat: StatName, value: i32) {
        *self.slot_mut(stat) = value;
    }

    /// Add to a stat, saturating at the i32 bounds
    pub fn add(&mut self, stat: StatName, amount: i32) {
        let slot = self.slot_mut(stat);
        *slot = slot.saturating_add(amount);
    }

    /// Builder-style setter
    pub fn with(mut self, stat: StatName, value: i32) -> Self {
        self.set(stat, value);
        self
    }

    /// Iterate `(stat, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (StatName, i32)> + '_ {
        StatName::ALL.iter().map(move |&stat| (stat, self.get(stat)))
    }

    /// Sum of every stat value
    pub fn total(&self) -> i32 {
        self.iter().fold(0i32, |acc, (_, v)| acc.saturating_add(v))
    }

    /// Sum of absolute stat values
    pub fn total_abs(&self) -> i32 {
        self.iter().fold(0i32, |acc, (_, v)| acc.saturating_add(v.saturating_abs()))
    }
}
