//! Trace document loading.
//!
//! Accepts the two JSON shapes Chrome-style tracers emit: a bare array of
//! records, or an object with the records under `traceEvents`. Anything else
//! is a structural error. Entries that fail to deserialize are skipped.

use super::schema::RawRecord;
use crate::utils::config::TRACE_EVENTS_FIELD;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load and parse a trace file from disk
///
/// **Public** - main entry point for file input
///
/// # Errors
/// * `ParseError::Io` - file cannot be opened or read
/// * `ParseError::JsonError` - file is not valid JSON
/// * `ParseError::InvalidFormat` - JSON is not a record collection
pub fn load_trace_file(path: impl AsRef<Path>) -> Result<Vec<RawRecord>, ParseError> {
    let path = path.as_ref();
    debug!("Loading trace from: {}", path.display());

    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_trace(&raw)
}

/// Parse an already-deserialized trace document into raw records
///
/// **Public** - used by `load_trace_file` and directly by tests
///
/// # Returns
/// Records in document order, minus entries that failed to deserialize
pub fn parse_trace(raw_trace: &serde_json::Value) -> Result<Vec<RawRecord>, ParseError> {
    let entries = extract_record_array(raw_trace)?;
    let records = parse_records_array(entries);

    debug!(
        "Parsed {} of {} trace records",
        records.len(),
        entries.len()
    );

    Ok(records)
}

/// Locate the record array inside the document
///
/// **Private** - internal helper for parse_trace
fn extract_record_array(raw_trace: &serde_json::Value) -> Result<&[serde_json::Value], ParseError> {
    match raw_trace {
        serde_json::Value::Array(entries) => Ok(entries),

        serde_json::Value::Object(obj) => obj
            .get(TRACE_EVENTS_FIELD)
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Trace object has no '{}' array",
                    TRACE_EVENTS_FIELD
                ))
            }),

        _ => Err(ParseError::InvalidFormat(
            "Trace must be a JSON array or an object with a traceEvents array".to_string(),
        )),
    }
}

/// Deserialize each entry, skipping the malformed ones
///
/// **Private** - internal parsing logic
fn parse_records_array(entries: &[serde_json::Value]) -> Vec<RawRecord> {
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        match RawRecord::deserialize(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                // Log but don't fail - partial traces are expected
                warn!("Skipping malformed trace record {}: {}", index, e);
            }
        }
    }

    records
}
