// LogLens - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Unparseable log lines are NOT errors; they never reach this module.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogLens operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogLensError {
    /// Line pattern loading or validation failed.
    Pattern(PatternError),

    /// The analysis service could not be reached or answered badly.
    Analysis(AnalysisError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for LogLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(e) => write!(f, "Pattern error: {e}"),
            Self::Analysis(e) => write!(f, "Analysis error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LogLensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Pattern(e) => Some(e),
            Self::Analysis(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

/// Errors related to building or loading a line pattern.
#[derive(Debug)]
pub enum PatternError {
    /// TOML pattern file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A required field is empty.
    MissingField {
        pattern_id: String,
        field: &'static str,
    },

    /// The line regex does not compile.
    InvalidRegex {
        pattern_id: String,
        pattern: String,
        source: regex::Error,
    },

    /// The line regex exceeds the maximum allowed length.
    RegexTooLong {
        pattern_id: String,
        length: usize,
        max_length: usize,
    },

    /// The line regex lacks one of the `timestamp`, `level`, `message` groups.
    MissingCaptureGroup {
        pattern_id: String,
        group: &'static str,
    },

    /// No built-in pattern has the requested id.
    UnknownBuiltin { id: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::MissingField { pattern_id, field } => {
                write!(f, "Pattern '{pattern_id}': missing required field '{field}'")
            }
            Self::InvalidRegex {
                pattern_id,
                pattern,
                source,
            } => write!(
                f,
                "Pattern '{pattern_id}': invalid regex '{pattern}': {source}"
            ),
            Self::RegexTooLong {
                pattern_id,
                length,
                max_length,
            } => write!(
                f,
                "Pattern '{pattern_id}': regex is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::MissingCaptureGroup { pattern_id, group } => write!(
                f,
                "Pattern '{pattern_id}': regex has no named capture group '{group}'"
            ),
            Self::UnknownBuiltin { id } => write!(f, "No built-in line pattern named '{id}'"),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PatternError> for LogLensError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

// ---------------------------------------------------------------------------
// Analysis errors
// ---------------------------------------------------------------------------

/// Errors raised by the analysis service client.
///
/// All variants are recoverable: the caller keeps its ingested entries and
/// decides whether to report or retry.
#[derive(Debug)]
pub enum AnalysisError {
    /// The HTTP request failed before a response arrived (connect, DNS, TLS).
    Transport(reqwest::Error),

    /// The request did not complete within the configured timeout.
    Timeout { timeout_secs: u64 },

    /// The service answered with a non-success status code.
    Status { status: u16, body: String },

    /// The response body did not have the expected structure.
    Format { reason: String },

    /// The configured base URL is not a valid HTTP URL.
    InvalidUrl { url: String },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(source) => write!(f, "request to analysis service failed: {source}"),
            Self::Timeout { timeout_secs } => {
                write!(f, "analysis service did not answer within {timeout_secs}s")
            }
            Self::Status { status, body } if body.is_empty() => {
                write!(f, "analysis service returned HTTP {status}")
            }
            Self::Status { status, body } => {
                write!(f, "analysis service returned HTTP {status}: {body}")
            }
            Self::Format { reason } => {
                write!(f, "unexpected response from analysis service: {reason}")
            }
            Self::InvalidUrl { url } => write!(f, "invalid analysis service URL '{url}'"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(source) => Some(source),
            _ => None,
        }
    }
}

impl From<AnalysisError> for LogLensError {
    fn from(e: AnalysisError) -> Self {
        Self::Analysis(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogLensError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogLensError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogLens results.
pub type Result<T> = std::result::Result<T, LogLensError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_analysis_status_display_includes_body() {
        let err = AnalysisError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "analysis service returned HTTP 502: bad gateway"
        );

        let empty = AnalysisError::Status {
            status: 500,
            body: String::new(),
        };
        assert_eq!(empty.to_string(), "analysis service returned HTTP 500");
    }

    #[test]
    fn test_top_level_error_preserves_source_chain() {
        let err: LogLensError = PatternError::MissingCaptureGroup {
            pattern_id: "custom".to_string(),
            group: "level",
        }
        .into();
        assert!(err.to_string().starts_with("Pattern error:"));
        let source = err.source().expect("pattern error should be the source");
        assert!(source.to_string().contains("'level'"));
    }

    #[test]
    fn test_transport_error_exposes_reqwest_source() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = AnalysisError::Transport(req_err);
        assert!(err.to_string().contains("request to analysis service failed"));
        assert!(err.source().is_some());
    }
}
