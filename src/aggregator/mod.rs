//! Hierarchy reconstruction, self time and aggregation.
//!
//! This module transforms normalized spans into:
//! - An enclosure forest (parents fully contain their children)
//! - Per-span exclusive time
//! - Per-key self-time statistics and trace totals

pub mod classifier;
pub mod forest;
pub mod metrics;
pub mod self_time;

// Re-export main types and functions
pub use classifier::KeyStrategy;
pub use forest::{build_forest, flatten_forest, forest_depth};
pub use metrics::{
    aggregate_by_key, order_by_first_appearance, sort_by_total, Group, TraceTotals,
};
pub use self_time::{compute_self_times, SelfTimeAnomaly};
