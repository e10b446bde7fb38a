use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Spans: {}", report.span_count);
    println!("  Covered Time: {}", report.totals.covered_time);
    println!("  Groups: {}", report.groups.len());
    println!("  Anomalies: {}", report.anomalies.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Span Profiler Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string           - Schema version (e.g., '1.0.0')");
        println!("  source: string            - Trace file analyzed");
        println!("  span_count: number        - Spans after normalization");
        println!("  totals: object            - Trace-wide times");
        println!("    total_time: number      - Last root end minus first root start");
        println!("    covered_time: number    - Sum of root durations");
        println!("    unattributed_time: number - total_time - covered_time");
        println!("  category_marker: string   - Category substring aggregated");
        println!("  key_strategy: string      - Grouping key");
        println!("  groups: array             - Self-time statistics per key");
        println!("    key: string             - Group label");
        println!("    count: number           - Spans in group");
        println!("    mean: number            - Mean self time");
        println!("    std_dev: number         - Population standard deviation");
        println!("    sum: number             - Total self time");
        println!("    percent_of_covered: number? - Share of covered time");
        println!("  anomalies: array          - Spans with negative self time");
        println!("  forest: array?            - Span tree (if requested)");
        println!("  generated_at: string      - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Span Profiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Self-time profiling for Chrome-style execution traces.");
}
