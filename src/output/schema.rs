//! Output JSON schema for analysis reports.
//!
//! Schema is versioned to allow future evolution.

use crate::aggregator::{Group, SelfTimeAnomaly, TraceTotals};
use crate::parser::schema::Span;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace file the report was computed from
    pub source: String,

    /// Number of spans after normalization
    pub span_count: usize,

    pub totals: TraceTotals,

    /// Category marker used to select aggregated spans
    pub category_marker: String,

    /// Key strategy used for grouping
    pub key_strategy: String,

    pub groups: Vec<Group>,

    /// Spans with negative self time
    #[serde(default)]
    pub anomalies: Vec<SelfTimeAnomaly>,

    /// Reconstructed forest, only when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forest: Option<Vec<Span>>,

    /// Timestamp when report was generated
    pub generated_at: String,
}
