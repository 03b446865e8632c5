//! Equip compatibility: rules, messages and the memoizing cache

pub mod checker;
pub mod messages;
pub mod cache;

pub use checker::{
    check_compatibility, CompatibilityChecker, CompatibilityResult, PlayerContext, RarityGuidance,
};
pub use cache::{CacheStats, CompatibilityCache, SharedCompatibilityCache, DEFAULT_CACHE_CAPACITY};
