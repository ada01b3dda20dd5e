//! Reconciliation: cost comparison and session counters.

pub mod engine;
mod stats;

pub use engine::{is_no_data, normalize_cost, reconcile, Reconciliation};
pub use stats::{StatsAggregator, StatsSnapshot};
