// LogLens - core/report.rs
//
// Plain-text rendering of an analysis result.
// Sections whose data the service did not return are omitted so a partial
// response still renders.

use crate::core::model::AnalysisResult;
use crate::util::constants::REPORT_MAX_PATTERN_EXAMPLES;
use chrono::DateTime;
use std::fmt::Write;

/// Render the analysis overlay as a multi-section text report.
pub fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = write!(
        out,
        "Total entries: {}    Error rate: {:.2}%",
        result.total_entries,
        result.error_rate * 100.0
    );
    if let Some(elapsed) = result.processing_time_text() {
        let _ = write!(out, "    Processing time: {elapsed}");
    }
    out.push('\n');

    if !result.by_level.is_empty() {
        out.push_str("\nDistribution by level\n");
        for (level, count) in &result.by_level {
            let _ = writeln!(out, "  {level:<6} {count}");
        }
    }

    if !result.time_series.is_empty() {
        out.push_str("\nVolume over time\n");
        for point in &result.time_series {
            let _ = writeln!(
                out,
                "  {}  total {:>5}  errors {:>5}",
                display_time(&point.timestamp),
                point.count,
                point.error_count
            );
        }
    }

    if !result.patterns.is_empty() {
        out.push_str("\nDetected patterns\n");
        for pattern in &result.patterns {
            let _ = writeln!(out, "  {} ({} occurrences)", pattern.pattern, pattern.occurrences);
            for example in pattern.examples.iter().take(REPORT_MAX_PATTERN_EXAMPLES) {
                let _ = writeln!(out, "    e.g. {example}");
            }
        }
    }

    if !result.anomalies.is_empty() {
        out.push_str("\nAnomalies\n");
        for anomaly in &result.anomalies {
            let _ = writeln!(
                out,
                "  {}  {} = {:.2} (threshold {:.2})",
                display_time(&anomaly.timestamp),
                anomaly.metric,
                anomaly.value,
                anomaly.threshold
            );
        }
    }

    out
}

/// Shorten RFC 3339 service times to minutes; anything else is shown verbatim.
fn display_time(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
