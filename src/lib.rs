//! Span Profiler
//!
//! Rebuilds the call hierarchy of a flat, unordered set of timed execution
//! spans (Chrome-style `X` and `B`/`E` records), computes the time each span
//! spends outside its nested sub-spans, and aggregates that self time by
//! operation.
//!
//! This crate provides the core implementation for the
//! `span-profile` CLI tool.
//!
//! ## Pipeline
//!
//! ```ignore
//! use span_profiler::aggregator::{aggregate_by_key, build_forest, compute_self_times, flatten_forest, TraceTotals};
//! use span_profiler::parser::{load_trace_file, normalize_records, NormalizeOptions};
//!
//! let records = load_trace_file("trace.json")?;
//! let spans = normalize_records(records, &NormalizeOptions::new());
//! let mut forest = build_forest(spans);
//! let anomalies = compute_self_times(&mut forest);
//! let totals = TraceTotals::from_forest(&forest)?;
//! let groups = aggregate_by_key(flatten_forest(&forest), |s| s.name.clone(), "conv", totals.covered_time)?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
