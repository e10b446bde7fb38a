//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading a trace document.
///
/// These are structural: a single malformed record never produces one.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid trace format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during forest analysis and aggregation
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Exclusive time was never computed for span: {0}")]
    SelfTimeMissing(String),

    #[error("Trace contains no spans")]
    EmptyTrace,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
