//! Engine configuration
//!
//! Tunables for the cache, the rarity guidance warnings and item comparison.
//! Every field has a default, so a config file only needs the overrides.

use serde::{Deserialize, Serialize};

use crate::compare::ComparisonThresholds;
use crate::compat::{RarityGuidance, DEFAULT_CACHE_CAPACITY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum memoized compatibility results
    pub cache_capacity: usize,
    pub guidance: RarityGuidance,
    pub comparison: ComparisonThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            guidance: RarityGuidance::default(),
            comparison: ComparisonThresholds::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(src: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(src)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config =
            EngineConfig::from_ron_str("(cache_capacity: 16, comparison: (strong: 20))").unwrap();
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.comparison.strong, 20);
        assert_eq!(config.comparison.minor, 3);
        assert_eq!(config.guidance, RarityGuidance::default());
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(EngineConfig::from_ron_str("()").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_ron_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_ron_string().unwrap();
        assert_eq!(EngineConfig::from_ron_str(&text).unwrap(), config);
    }
}
