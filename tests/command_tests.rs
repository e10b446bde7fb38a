use span_profiler::aggregator::KeyStrategy;
use span_profiler::commands::{
    analyze_records, execute_analyze, to_report, validate_args, validate_report_file, AnalyzeArgs,
};
use span_profiler::output::{read_report, write_report};
use span_profiler::parser::RawRecord;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn args() -> AnalyzeArgs {
    AnalyzeArgs {
        trace_file: PathBuf::from("trace.json"),
        ..Default::default()
    }
}

fn model_records() -> Vec<RawRecord> {
    vec![
        RawRecord::begin("warmup", 0).with_category("setup"),
        RawRecord::end("warmup", 5).with_category("setup"),
        RawRecord::begin("run", 10).with_category("conv_net"),
        RawRecord::complete("conv1", 20, 30).with_category("conv"),
        RawRecord::complete("conv2", 60, 10).with_category("conv"),
        RawRecord::complete("memcpy", 75, 5),
        RawRecord::complete("conv1", 80, 10).with_category("conv"),
        RawRecord::end("run", 110).with_category("conv_net"),
    ]
}

#[test]
fn test_validate_args_valid() {
    assert!(validate_args(&args()).is_ok());
}

#[test]
fn test_validate_args_empty_trace_path() {
    assert!(validate_args(&AnalyzeArgs::default()).is_err());
}

#[test]
fn test_validate_args_invalid_pattern() {
    let args = AnalyzeArgs {
        event_pattern: Some("[conv".to_string()),
        ..args()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_analyze_records_pipeline() {
    let analysis = analyze_records(model_records(), &args()).unwrap().unwrap();

    // memcpy is runtime overhead and dropped by default
    assert_eq!(analysis.span_count, 5);
    assert_eq!(analysis.forest.len(), 2);
    assert_eq!(analysis.totals.total_time, 110);
    assert_eq!(analysis.totals.covered_time, 105);
    assert_eq!(analysis.totals.unattributed_time, 5);
    assert!(analysis.anomalies.is_empty());

    let run = &analysis.forest[1];
    assert_eq!(run.exclusive_time, Some(100 - 30 - 10 - 10));

    let keys: Vec<_> = analysis.groups.iter().map(|g| g.key.as_str()).collect();
    // first appearance in emission order; run is emitted at its end marker
    assert_eq!(keys, vec!["conv1 (conv)", "conv2 (conv)", "run (conv_net)"]);

    let conv1 = &analysis.groups[0];
    assert_eq!(conv1.count, 2);
    assert_eq!(conv1.sum, 40);
    assert!((conv1.std_dev - 10.0).abs() < 1e-9);
}

#[test]
fn test_analyze_records_skip_and_key() {
    let args = AnalyzeArgs {
        skip: 2,
        key: KeyStrategy::Category,
        ..args()
    };

    let analysis = analyze_records(model_records(), &args).unwrap().unwrap();

    // both warmup markers were skipped
    assert_eq!(analysis.forest.len(), 1);
    let keys: Vec<_> = analysis.groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["conv", "conv_net"]);
    assert_eq!(analysis.groups[0].count, 3);
    assert_eq!(analysis.groups[0].sum, 50);
}

#[test]
fn test_execute_analyze_writes_report() {
    let mut trace = NamedTempFile::new().unwrap();
    write!(
        trace,
        r#"[
            {{"name": "conv1", "ph": "X", "ts": 0, "dur": 10, "args": {{"type": "conv"}}}},
            {{"name": "conv1", "ph": "X", "ts": 20, "dur": 30, "args": {{"type": "conv"}}}}
        ]"#
    )
    .unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    let report_path = out_dir.path().join("report.json");

    let args = AnalyzeArgs {
        trace_file: trace.path().to_path_buf(),
        summarize: true,
        output_json: Some(report_path.clone()),
        ..Default::default()
    };

    execute_analyze(args).unwrap();

    let report = read_report(&report_path).unwrap();
    assert_eq!(report.span_count, 2);
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].sum, 40);
    assert!(report.forest.is_none());
}

#[test]
fn test_execute_analyze_rejects_malformed_document() {
    let mut trace = NamedTempFile::new().unwrap();
    write!(trace, r#"{{"events": []}}"#).unwrap();

    let args = AnalyzeArgs {
        trace_file: trace.path().to_path_buf(),
        ..Default::default()
    };

    assert!(execute_analyze(args).is_err());
}

#[test]
fn test_sort_by_total_overrides_emission_order() {
    let args = AnalyzeArgs {
        sort_by_total: true,
        ..args()
    };

    let analysis = analyze_records(model_records(), &args).unwrap().unwrap();
    let keys: Vec<_> = analysis.groups.iter().map(|g| g.key.as_str()).collect();

    assert_eq!(keys, vec!["run (conv_net)", "conv1 (conv)", "conv2 (conv)"]);
}

#[test]
fn test_validate_report_file_accepts_written_report() {
    let analysis = analyze_records(model_records(), &args()).unwrap().unwrap();
    let report = to_report(&analysis, &args());

    let out_dir = tempfile::tempdir().unwrap();
    let report_path = out_dir.path().join("report.json");
    write_report(&report, &report_path).unwrap();

    assert!(validate_report_file(report_path).is_ok());
}

#[test]
fn test_validate_report_file_rejects_non_report() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"traceEvents": []}}"#).unwrap();

    assert!(validate_report_file(file.path().to_path_buf()).is_err());
}
