//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the trace file
//! 2. Normalizes records into spans
//! 3. Rebuilds the enclosure forest and computes self time
//! 4. Aggregates self time by key
//! 5. Prints the requested views and writes the optional JSON report

use crate::aggregator::{
    aggregate_by_key, build_forest, compute_self_times, flatten_forest, forest_depth,
    order_by_first_appearance, sort_by_total, Group, SelfTimeAnomaly, TraceTotals,
};
use crate::commands::models::AnalyzeArgs;
use crate::output::{
    format_group_line, format_summary, render_tree, write_report, AnalysisReport,
};
use crate::parser::{load_trace_file, normalize_records, NormalizeOptions, RawRecord, Span};
use crate::utils::config::{MAX_REPORT_FOREST_DEPTH, MAX_SKIP, SCHEMA_VERSION};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Result of running the pipeline over one trace
///
/// **Public** - returned by analyze_records
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Spans that survived normalization
    pub span_count: usize,

    /// Root spans, each owning its enclosed descendants
    pub forest: Vec<Span>,

    pub totals: TraceTotals,

    pub groups: Vec<Group>,

    pub anomalies: Vec<SelfTimeAnomaly>,
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file unreadable or not a record collection
/// * Invalid event pattern
/// * Report write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Analyzing trace: {}", args.trace_file.display());

    info!("Step 1/3: Loading trace...");
    let records = load_trace_file(&args.trace_file)
        .with_context(|| format!("Failed to load trace {}", args.trace_file.display()))?;

    info!("Step 2/3: Building span forest...");
    let Some(analysis) = analyze_records(records, &args)? else {
        info!("No spans left after filtering, nothing to report");
        return Ok(());
    };

    info!("Step 3/3: Reporting...");
    print_analysis(&analysis, &args);

    if let Some(output_path) = &args.output_json {
        let report = to_report(&analysis, &args);
        write_report(&report, output_path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", output_path.display());
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Run normalization, reconstruction, self time and aggregation
///
/// **Public** - the whole pipeline minus file I/O
///
/// Groups are listed in the order their key first appears among the
/// normalized spans (trace emission order), unless `sort_by_total` is set.
///
/// # Returns
/// `None` when no span survives normalization
pub fn analyze_records(records: Vec<RawRecord>, args: &AnalyzeArgs) -> Result<Option<Analysis>> {
    let options = build_normalize_options(args)?;

    let spans = normalize_records(records, &options);
    if spans.is_empty() {
        return Ok(None);
    }
    let span_count = spans.len();

    let strategy = args.key;
    let emitted_keys: Vec<String> = spans
        .iter()
        .filter(|span| span.category.contains(args.category_marker.as_str()))
        .map(|span| strategy.key_of(span))
        .collect();

    let mut forest = build_forest(spans);
    debug!(
        "Forest has {} roots, depth {}",
        forest.len(),
        forest_depth(&forest)
    );

    let anomalies = compute_self_times(&mut forest);
    let totals = TraceTotals::from_forest(&forest)?;

    let mut groups = aggregate_by_key(
        flatten_forest(&forest),
        |span: &Span| strategy.key_of(span),
        &args.category_marker,
        totals.covered_time,
    )?;
    order_by_first_appearance(&mut groups, emitted_keys);

    if args.sort_by_total {
        sort_by_total(&mut groups);
    }

    Ok(Some(Analysis {
        span_count,
        forest,
        totals,
        groups,
        anomalies,
    }))
}

/// Translate CLI filter arguments into normalizer options
///
/// **Public** - also used by validate_args
pub fn build_normalize_options(args: &AnalyzeArgs) -> Result<NormalizeOptions> {
    let mut options = NormalizeOptions::new()
        .with_runtime(args.include_runtime)
        .with_skip(args.skip);

    if let Some(pattern) = &args.event_pattern {
        options = options
            .with_event_pattern(pattern)
            .with_context(|| format!("Invalid event pattern '{}'", pattern))?;
    }

    Ok(options)
}

/// Print the views requested in `args` to stdout
///
/// **Private** - internal helper for execute_analyze
fn print_analysis(analysis: &Analysis, args: &AnalyzeArgs) {
    if args.aggregate {
        for group in &analysis.groups {
            println!("{}", format_group_line(group));
        }
        println!();
    }

    if args.show_tree {
        println!("{}", render_tree(&analysis.forest));
        println!();
    }

    if args.summarize {
        println!("{}", format_summary(&analysis.totals));
    }

    if !analysis.anomalies.is_empty() {
        println!(
            "Warning: {} spans have negative self time",
            analysis.anomalies.len()
        );
    }
}

/// Convert an analysis into the JSON report format
///
/// **Public** - used by execute_analyze and tests
pub fn to_report(analysis: &Analysis, args: &AnalyzeArgs) -> AnalysisReport {
    use chrono::Utc;

    AnalysisReport {
        version: SCHEMA_VERSION.to_string(),
        source: args.trace_file.display().to_string(),
        span_count: analysis.span_count,
        totals: analysis.totals,
        category_marker: args.category_marker.clone(),
        key_strategy: args.key.as_str().to_string(),
        groups: analysis.groups.clone(),
        anomalies: analysis.anomalies.clone(),
        forest: report_forest(analysis, args),
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Forest to embed in the report, if requested and shallow enough to encode
///
/// **Private** - deeper forests are still printed by `--tree`
fn report_forest(analysis: &Analysis, args: &AnalyzeArgs) -> Option<Vec<Span>> {
    if !args.show_tree {
        return None;
    }

    let depth = forest_depth(&analysis.forest);
    if depth > MAX_REPORT_FOREST_DEPTH {
        warn!(
            "Forest depth {} exceeds {}, omitting it from the report",
            depth, MAX_REPORT_FOREST_DEPTH
        );
        return None;
    }

    Some(analysis.forest.clone())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.trace_file.as_os_str().is_empty() {
        anyhow::bail!("Trace file path cannot be empty");
    }

    if args.skip > MAX_SKIP {
        anyhow::bail!("skip is too large (max {})", MAX_SKIP);
    }

    build_normalize_options(args)?;

    Ok(())
}
