//! Item comparison and loadout recommendations

pub mod comparator;
pub mod optimizer;

pub use comparator::{
    compare_items, Comparator, ComparisonResult, ComparisonThresholds, StatDelta, UpgradeTier,
};
pub use optimizer::{
    optimize_loadout, recommend_upgrades, OptimizedLoadout, Optimizer, Priority, Recommendation,
};
