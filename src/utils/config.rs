//! Configuration and constants for the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Category assigned to records that carry no classification tag.
/// These are runtime/infrastructure overhead and are dropped unless requested.
pub const RUNTIME_CATEGORY: &str = "runtime";

// Keys looked up (in order) under a record's `args` to find its category
pub const CATEGORY_ARG_KEYS: &[&str] = &["type", "kind"];

/// Field holding the record array in the JSON-object trace form
pub const TRACE_EVENTS_FIELD: &str = "traceEvents";

/// Category substring selecting the span family that gets aggregated
pub const DEFAULT_CATEGORY_MARKER: &str = "conv";

pub const MAX_SKIP: usize = 10_000_000;

/// Deepest forest still embedded in the JSON report. Each span level costs
/// two levels of JSON nesting and serde_json refuses input past 128.
pub const MAX_REPORT_FOREST_DEPTH: usize = 60;
