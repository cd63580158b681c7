// LogLens - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogLens";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Parsing
// =============================================================================

/// Identifier of the line pattern used when none is configured.
pub const DEFAULT_PATTERN_ID: &str = "level-brackets";

/// chrono format of the timestamp captured by the built-in patterns.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maximum regex pattern length to prevent ReDoS.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

/// Maximum size of a user pattern TOML file in bytes.
pub const MAX_PATTERN_FILE_SIZE: u64 = 64 * 1024; // 64 KB

/// Named capture groups every line pattern must define.
pub const REQUIRED_CAPTURE_GROUPS: &[&str] = &["timestamp", "level", "message"];

/// Largest input file the CLI will read into memory.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MiB

// =============================================================================
// Analysis service
// =============================================================================

/// Base URL of the analysis service when none is configured.
pub const DEFAULT_ANALYSIS_URL: &str = "http://127.0.0.1:8080";

/// Path of the statistics endpoint, relative to the base URL.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Path of the AI summary endpoint, relative to the base URL.
pub const SUMMARY_PATH: &str = "/api/analyze/ai";

/// Default request timeout for a single analysis call (seconds).
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 30;

/// Minimum user-configurable analysis timeout (seconds).
pub const MIN_ANALYSIS_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable analysis timeout (seconds).
pub const MAX_ANALYSIS_TIMEOUT_SECS: u64 = 600;

/// Longest error-response body kept in an `AnalysisError::Status`.
pub const MAX_ERROR_BODY_CHARS: usize = 512;

// =============================================================================
// Report rendering
// =============================================================================

/// Number of pattern examples printed per pattern in the text report.
pub const REPORT_MAX_PATTERN_EXAMPLES: usize = 3;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
