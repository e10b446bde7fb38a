//! Output writers for analysis results.
//!
//! This module handles:
//! - JSON reports (write and read back)
//! - Text rendering of groups, totals and the span tree

pub mod json;
pub mod schema;
pub mod text;

// Re-export main functions
pub use json::{read_report, write_report};
pub use schema::AnalysisReport;
pub use text::{format_group_line, format_summary, format_us, render_tree};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
