// LogLens - core/parser.rs
//
// Single-line parsing against a line pattern.
// Core layer: pure functions, no I/O.
//
// A line that does not match, carries an unrecognised level token, or has a
// timestamp that is not a real calendar instant yields `None`. Malformed
// lines are expected in free-form logs and are never an error.

use crate::core::model::{Level, LogEntry};
use crate::core::pattern::LinePattern;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse one raw line (without its trailing newline) into a `LogEntry`.
///
/// Returns `None` when the line is not a recognised log record.
pub fn parse_line(line: &str, pattern: &LinePattern) -> Option<LogEntry> {
    let caps = pattern.regex().captures(line)?;

    let level = Level::from_token(caps.name("level")?.as_str())?;
    let timestamp = parse_timestamp(
        caps.name("timestamp")?.as_str(),
        pattern.timestamp_format(),
    )?;
    let message = caps
        .name("message")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(LogEntry::new(timestamp, level, message))
}

// =============================================================================
// Timestamp parsing
// =============================================================================

/// Parse a captured timestamp with a chrono format string, as UTC.
///
/// Strategy:
///   1. Full `NaiveDateTime` parse with the given format.
///   2. `NaiveDate`-only parse (date-only formats such as `%Y-%m-%d`),
///      treated as midnight.
///
/// Out-of-range fields (month 13, 30 February, hour 25) fail both steps.
pub(crate) fn parse_timestamp(raw: &str, format: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
        return Some(ndt.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, format)
        .ok()
        .and_then(|nd| nd.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
