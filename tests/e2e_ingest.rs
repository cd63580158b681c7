// LogLens - tests/e2e_ingest.rs
//
// End-to-end tests for the file -> entries -> filter -> export pipeline.
//
// These tests read real fixture files from disk, compile the real built-in
// line patterns, and write real export files into a temporary directory.

use loglens::app::session::{AnalysisState, Session};
use loglens::core::export::{export_csv, export_json};
use loglens::core::filter::{filter_entries, LogFilter};
use loglens::core::ingest::{ingest, ingest_with_stats};
use loglens::core::model::Level;
use loglens::core::pattern::LinePattern;
use loglens::platform::fs::{load_pattern_file, read_log_file};
use loglens::util::constants::MAX_INPUT_FILE_SIZE;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    read_log_file(&fixture(name), MAX_INPUT_FILE_SIZE).unwrap()
}

// =============================================================================
// Ingestion
// =============================================================================

#[test]
fn e2e_service_log_ingests_valid_lines_in_order() {
    let raw = read_fixture("service_sample.log");
    let (entries, stats) = ingest_with_stats(&raw, &LinePattern::default());

    assert_eq!(stats.entries, 7);
    assert_eq!(stats.lines_total, 11);
    assert_eq!(stats.lines_blank, 1);
    assert_eq!(stats.lines_skipped, 3);

    let levels: Vec<Level> = entries.iter().map(|e| e.level()).collect();
    assert_eq!(
        levels,
        vec![
            Level::Info,
            Level::Debug,
            Level::Error,
            Level::Warn,
            Level::Info,
            Level::Error,
            Level::Info,
        ]
    );
    assert_eq!(entries[2].message(), "disk failure on /dev/sdb1");
    assert_eq!(entries[2].timestamp_text(), "2024-01-15T10:00:00Z");
}

#[test]
fn e2e_bracket_preset_reads_uploader_format() {
    let raw = read_fixture("bracket_sample.log");
    let pattern = LinePattern::builtin("bracket-timestamp").unwrap();
    let entries = ingest(&raw, &pattern);

    // WARNING is not a recognised level token, so that line is skipped.
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].level(), Level::Error);
    assert_eq!(
        entries[1].message(),
        "Connection refused by analysis backend"
    );

    // The default pattern matches none of these lines.
    assert!(ingest(&raw, &LinePattern::default()).is_empty());
}

#[test]
fn e2e_custom_pattern_file() {
    let dir = TempDir::new().unwrap();
    let pattern_path = dir.path().join("pipe.toml");
    std::fs::write(
        &pattern_path,
        r#"
[pattern]
id = "pipe-separated"
name = "Pipe separated"
line_pattern = '^(?P<timestamp>\d{2}/\d{2}/\d{4} \d{2}:\d{2}) \| (?P<level>[A-Z]+) \| (?P<message>.*)$'
timestamp_format = "%d/%m/%Y %H:%M"
"#,
    )
    .unwrap();

    let pattern = load_pattern_file(&pattern_path).unwrap();
    let entries = ingest(
        "15/01/2024 10:00 | WARN | queue depth 912\n15/01/2024 10:01 | INFO | drained\n",
        &pattern,
    );
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].timestamp_text(), "2024-01-15T10:00:00Z");
    assert_eq!(entries[0].message(), "queue depth 912");
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn e2e_filters_compose_over_fixture() {
    let raw = read_fixture("service_sample.log");
    let entries = ingest(&raw, &LinePattern::default());

    let errors = filter_entries(&entries, &LogFilter::default().with_levels([Level::Error]));
    assert_eq!(errors.len(), 2);

    let keyword = filter_entries(&entries, &LogFilter::default().with_keyword("TIMEOUT"));
    assert_eq!(keyword.len(), 1);
    assert_eq!(keyword[0].message(), "Timeout budget reset for new day");

    let window = LogFilter::default()
        .with_start_text("2024-01-15 10:00:00")
        .with_end_text("2024-01-16");
    assert_eq!(filter_entries(&entries, &window).len(), 4);

    let window_errors = window.clone().with_levels([Level::Error]);
    let hits = filter_entries(&entries, &window_errors);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].message(), "nightly backup timed out after 3600s");
}

#[test]
fn e2e_session_keeps_entries_when_analysis_fails() {
    let raw = read_fixture("service_sample.log");
    let mut session = Session::default();
    let token = session.load_text(&raw).unwrap();

    session.apply_analysis(
        token,
        Err(loglens::util::error::AnalysisError::Timeout { timeout_secs: 30 }),
    );
    assert!(matches!(session.analysis(), AnalysisState::Failed(_)));

    session.set_filter(LogFilter::default().with_levels([Level::Warn]));
    let visible = session.visible_entries();
    assert_eq!(visible.len(), 1);
    assert_eq!(
        visible[0].message(),
        "retrying write to volume data-2 (attempt 1)"
    );
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_filtered_entries_to_csv_and_json() {
    let raw = read_fixture("service_sample.log");
    let entries = ingest(&raw, &LinePattern::default());
    let errors = filter_entries(&entries, &LogFilter::default().with_levels([Level::Error]));

    let dir = TempDir::new().unwrap();

    let csv_path = dir.path().join("errors.csv");
    let file = std::fs::File::create(&csv_path).unwrap();
    assert_eq!(export_csv(&errors, file, &csv_path).unwrap(), 2);
    let csv_text = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "timestamp,level,message");
    assert_eq!(lines[1], "2024-01-15T10:00:00Z,ERROR,disk failure on /dev/sdb1");

    let json_path = dir.path().join("errors.json");
    let file = std::fs::File::create(&json_path).unwrap();
    assert_eq!(export_json(&errors, file, &json_path).unwrap(), 2);
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[1]["timestamp"], "2024-01-15T23:59:59Z");
    assert_eq!(parsed[1]["level"], "ERROR");
}
