//! Trace parsing and span normalization.
//!
//! This module handles:
//! - Loading Chrome-style JSON trace documents
//! - Deserializing raw records leniently
//! - Pairing begin/end markers and applying record filters

pub mod normalizer;
pub mod schema;
pub mod trace_file;

// Re-export main types
pub use normalizer::{normalize_records, NormalizeOptions};
pub use schema::{Phase, RawRecord, Span, Timestamp};
pub use trace_file::{load_trace_file, parse_trace};
