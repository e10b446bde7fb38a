use crate::aggregator::KeyStrategy;
use crate::utils::config::DEFAULT_CATEGORY_MARKER;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace file to analyze
    pub trace_file: PathBuf,

    /// Keep only records whose name or category matches this regex
    pub event_pattern: Option<String>,

    /// Keep runtime-overhead records
    pub include_runtime: bool,

    /// Number of leading matching records to drop
    pub skip: usize,

    /// Category substring selecting aggregated spans
    pub category_marker: String,

    /// Grouping key
    pub key: KeyStrategy,

    /// Print per-group self-time lines
    pub aggregate: bool,

    /// Print trace totals
    pub summarize: bool,

    /// Print the span tree (and include it in the JSON report)
    pub show_tree: bool,

    /// Order groups by total self time instead of first appearance
    pub sort_by_total: bool,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace_file: PathBuf::new(),
            event_pattern: None,
            include_runtime: false,
            skip: 0,
            category_marker: DEFAULT_CATEGORY_MARKER.to_string(),
            key: KeyStrategy::default(),
            aggregate: true,
            summarize: false,
            show_tree: false,
            sort_by_total: false,
            output_json: None,
        }
    }
}
