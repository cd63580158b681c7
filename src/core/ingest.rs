// LogLens - core/ingest.rs
//
// Batch ingestion: raw file text -> ordered entry sequence.
// Core layer: pure and deterministic; the only time input is the literal
// timestamp text of each line.

use crate::core::model::{IngestStats, LogEntry};
use crate::core::parser::parse_line;
use crate::core::pattern::LinePattern;

/// Turn raw file text into the ordered sequence of parsed entries.
///
/// Blank lines are dropped, unparseable lines are skipped, and the relative
/// order of the surviving lines is preserved. Zero parsed lines is an empty
/// result, not an error.
pub fn ingest(raw: &str, pattern: &LinePattern) -> Vec<LogEntry> {
    ingest_with_stats(raw, pattern).0
}

/// Like [`ingest`], also returning aggregate line counts.
pub fn ingest_with_stats(raw: &str, pattern: &LinePattern) -> (Vec<LogEntry>, IngestStats) {
    let mut stats = IngestStats::default();
    let mut entries = Vec::new();

    // `lines()` splits on both "\n" and "\r\n".
    for line in raw.lines() {
        stats.lines_total += 1;

        if line.trim().is_empty() {
            stats.lines_blank += 1;
            continue;
        }

        match parse_line(line, pattern) {
            Some(entry) => entries.push(entry),
            None => stats.lines_skipped += 1,
        }
    }
    stats.entries = entries.len();

    tracing::debug!(
        pattern = pattern.id(),
        lines = stats.lines_total,
        blank = stats.lines_blank,
        skipped = stats.lines_skipped,
        entries = stats.entries,
        "Ingestion complete"
    );

    (entries, stats)
}
