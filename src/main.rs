//! Span Profiler CLI
//!
//! Self-time profiling for Chrome-style execution traces.
//! Rebuilds the span hierarchy and reports exclusive time per operation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use span_profiler::aggregator::KeyStrategy;
use span_profiler::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use span_profiler::utils::config::DEFAULT_CATEGORY_MARKER;

/// Span Profiler - self-time analysis for execution traces
#[derive(Parser, Debug)]
#[command(name = "span-profile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a trace file
    Analyze {
        /// Trace JSON file (record array or object with traceEvents)
        file: PathBuf,

        /// Only keep records whose name or category matches this regex
        #[arg(short, long)]
        event: Option<String>,

        /// Include runtime-overhead records
        #[arg(long)]
        runtime: bool,

        /// Skip this many leading matching records
        #[arg(long, default_value = "0")]
        skip: usize,

        /// Category substring selecting the spans to aggregate
        #[arg(long, env = "SPAN_PROFILE_CATEGORY", default_value = DEFAULT_CATEGORY_MARKER)]
        category: String,

        /// Grouping key: name-and-category, name or category
        #[arg(long, default_value = "name-and-category")]
        key: KeyStrategy,

        /// Do not print per-group self-time lines
        #[arg(long)]
        no_aggregate: bool,

        /// Print trace totals
        #[arg(long)]
        summarize: bool,

        /// Print the reconstructed span tree
        #[arg(long)]
        tree: bool,

        /// Order groups by total self time, largest first (default: order of
        /// first appearance in the trace)
        #[arg(long)]
        sort_by_total: bool,

        /// Output path for JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            file,
            event,
            runtime,
            skip,
            category,
            key,
            no_aggregate,
            summarize,
            tree,
            sort_by_total,
            output,
        } => {
            let args = AnalyzeArgs {
                trace_file: file,
                event_pattern: event,
                include_runtime: runtime,
                skip,
                category_marker: category,
                key,
                aggregate: !no_aggregate,
                summarize,
                show_tree: tree,
                sort_by_total,
                output_json: output,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
