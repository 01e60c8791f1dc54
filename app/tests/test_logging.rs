//! FILENAME: tests/test_logging.rs
//! Warnings the export writes through the unified log backend.

mod common;

use common::records;
use once_cell::sync::Lazy;
use pivot_export::{export_pivot_table, logging, ExportOptions, MemorySink, MissingValuePolicy};
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

// The backend holds one process-wide file, so every test here shares it.
static LOG_DIR: Lazy<TempDir> = Lazy::new(|| tempfile::tempdir().expect("create temp dir"));

fn log_path() -> PathBuf {
    LOG_DIR.path().join("export.log")
}

fn logged_lines() -> Vec<String> {
    log::logger().flush();
    std::fs::read_to_string(log_path())
        .expect("read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

fn init_logging() {
    logging::init(log::LevelFilter::Info, Some(&log_path())).unwrap();
}

#[test]
fn test_empty_input_logs_warning() {
    init_logging();
    let mut sink = MemorySink::new();

    let outcome =
        export_pivot_table(&[], "provider", "status", &ExportOptions::default(), &mut sink).unwrap();
    assert!(outcome.is_skipped());

    let lines = logged_lines();
    assert!(
        lines.iter().any(|l| l.ends_with("|W|EXPORT|No data to export")),
        "{:?}",
        lines
    );
}

#[test]
fn test_skip_policy_logs_skipped_count() {
    init_logging();
    let data = records(vec![
        json!({"provider": "Viettel", "status": "active"}),
        json!({"provider": "Viettel", "status": null}),
    ]);
    let options = ExportOptions::default().with_missing_values(MissingValuePolicy::Skip);
    let mut sink = MemorySink::new();

    export_pivot_table(&data, "provider", "status", &options, &mut sink).unwrap();
    assert_eq!(sink.len(), 1);

    let lines = logged_lines();
    let line = lines
        .iter()
        .find(|l| l.contains("|W|EXPORT|Skipped 1 of 2 records"))
        .unwrap_or_else(|| panic!("no skip warning in {:?}", lines));
    assert!(line.ends_with("without a value for 'provider' or 'status'"));
}
