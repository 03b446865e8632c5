//! Character stats and equipment stat aggregation

pub mod stat;
pub mod aggregate;

pub use stat::{StatName, Stats, ACCURACY_MAX, ACCURACY_MIN};
pub use aggregate::{calculate_stats, StatCalculationResult, StatContribution};
