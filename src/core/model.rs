// LogLens - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

// =============================================================================
// Log Entry (output of parsing)
// =============================================================================

/// A single parsed log record.
///
/// Entries are immutable and can only be created by the line parser, so every
/// `LogEntry` in existence was derived from exactly one raw line that matched
/// the active line pattern. Serialises as
/// `{"timestamp": "2024-01-15T10:00:00Z", "level": "ERROR", "message": "...", "metadata": null}`,
/// the shape the analysis service expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    timestamp: DateTime<Utc>,
    level: Level,
    message: String,
    metadata: Option<serde_json::Value>,
}

impl LogEntry {
    pub(crate) fn new(timestamp: DateTime<Utc>, level: Level, message: String) -> Self {
        Self {
            timestamp,
            level,
            message,
            metadata: None,
        }
    }

    /// Instant parsed from the line's timestamp text, interpreted as UTC.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Free text following the level token, exactly as it appeared.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Reserved extension point; no producer populates it.
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Canonical, lexicographically sortable timestamp text (RFC 3339, UTC).
    pub fn timestamp_text(&self) -> String {
        self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true)
    }
}

// =============================================================================
// Level
// =============================================================================

/// The closed set of recognised log levels, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    /// Returns all variants in display order (most severe first).
    pub fn all() -> &'static [Level] {
        &[Level::Error, Level::Warn, Level::Info, Level::Debug]
    }

    /// The level token as it appears in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Match a level token captured from a log line.
    ///
    /// Tokens are compared exactly; anything outside the recognised set
    /// (including lower-case spellings) is rejected.
    pub fn from_token(token: &str) -> Option<Level> {
        match token {
            "ERROR" => Some(Level::Error),
            "WARN" => Some(Level::Warn),
            "INFO" => Some(Level::Info),
            "DEBUG" => Some(Level::Debug),
            _ => None,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parsing for level names typed by a user (CLI flags, config).
/// Case-insensitive, with `WARNING` accepted as an alias of `WARN`.
impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            other => Err(format!(
                "unknown level '{other}' (expected ERROR, WARN, INFO or DEBUG)"
            )),
        }
    }
}

// =============================================================================
// Ingest statistics
// =============================================================================

/// Aggregate counts for one ingestion run.
///
/// Skipped lines are only ever reported in aggregate; individual
/// unparseable lines are not surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Lines seen in the raw text.
    pub lines_total: usize,
    /// Empty or whitespace-only lines dropped before parsing.
    pub lines_blank: usize,
    /// Non-blank lines that did not produce an entry.
    pub lines_skipped: usize,
    /// Entries produced.
    pub entries: usize,
}

// =============================================================================
// Analysis result (owned by the external service)
// =============================================================================

/// Aggregate analysis computed by the external service for one batch.
///
/// Only structural presence is checked when decoding. `total_entries` and
/// `error_rate` are required; the aggregate sections default to empty so a
/// response without, say, `time_series` still decodes and the dependent
/// report section is simply omitted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisResult {
    pub total_entries: u64,
    #[serde(default)]
    pub by_level: BTreeMap<String, u64>,
    pub error_rate: f64,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub time_series: Vec<TimePoint>,
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
    /// Opaque duration as reported by the service (string, number or object).
    #[serde(default)]
    pub processing_time: Option<serde_json::Value>,
}

impl AnalysisResult {
    /// Display form of `processing_time`, if the service reported one.
    pub fn processing_time_text(&self) -> Option<String> {
        match self.processing_time.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A recurring message pattern detected by the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pattern {
    pub pattern: String,
    pub occurrences: u64,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// One bucket of the volume time series.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimePoint {
    /// Bucket time exactly as sent by the service.
    pub timestamp: String,
    pub count: u64,
    pub error_count: u64,
}

/// A metric value that crossed its threshold.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Anomaly {
    /// Time exactly as sent by the service.
    pub timestamp: String,
    pub metric: String,
    pub value: f64,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_level_token_is_exact() {
        assert_eq!(Level::from_token("WARN"), Some(Level::Warn));
        assert_eq!(Level::from_token("warn"), None);
        assert_eq!(Level::from_token("WARNING"), None);
        assert_eq!(Level::from_token("TRACE"), None);
    }

    #[test]
    fn test_level_from_str_is_lenient() {
        assert_eq!("error".parse::<Level>(), Ok(Level::Error));
        assert_eq!(" Warning ".parse::<Level>(), Ok(Level::Warn));
        assert!("fatal".parse::<Level>().is_err());
    }

    #[test]
    fn test_entry_serialises_in_service_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let entry = LogEntry::new(ts, Level::Error, "disk failure".to_string());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "timestamp": "2024-01-15T10:00:00Z",
                "level": "ERROR",
                "message": "disk failure",
                "metadata": null
            })
        );
        assert_eq!(entry.timestamp_text(), "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_analysis_result_optional_sections_default_to_empty() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"total_entries": 3, "error_rate": 0.5}"#).unwrap();
        assert_eq!(result.total_entries, 3);
        assert!(result.by_level.is_empty());
        assert!(result.time_series.is_empty());
        assert!(result.patterns.is_empty());
        assert!(result.anomalies.is_empty());
        assert_eq!(result.processing_time_text(), None);
    }

    #[test]
    fn test_service_timestamps_are_not_validated() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{
                "total_entries": 1,
                "error_rate": 0.0,
                "time_series": [{"timestamp": "2024-01-15 10:00:00", "count": 1, "error_count": 0}],
                "anomalies": [{"timestamp": "bucket-7", "metric": "volume", "value": 9.0, "threshold": 5.0}]
            }"#,
        )
        .unwrap();
        assert_eq!(result.time_series[0].timestamp, "2024-01-15 10:00:00");
        assert_eq!(result.anomalies[0].timestamp, "bucket-7");
    }

    #[test]
    fn test_processing_time_text_handles_non_string_values() {
        let result: AnalysisResult = serde_json::from_str(
            r#"{"total_entries": 0, "error_rate": 0.0, "processing_time": {"secs": 0, "nanos": 1500}}"#,
        )
        .unwrap();
        let text = result.processing_time_text().unwrap();
        assert!(text.contains("1500"), "got {text}");
    }
}
