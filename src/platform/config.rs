// LogLens - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogLens configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/loglens/ or %APPDATA%\LogLens\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Base URL of the analysis service.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Request analysis automatically after each load.
    pub enabled: Option<bool>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Id of a built-in line pattern.
    pub pattern: Option<String>,
    /// Path to a user pattern TOML file (takes precedence over `pattern`).
    pub pattern_file: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Analysis --
    pub analysis_url: String,
    pub analysis_timeout_secs: u64,
    pub analysis_enabled: bool,

    // -- Parsing --
    pub pattern_id: String,
    pub pattern_file: Option<PathBuf>,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis_url: constants::DEFAULT_ANALYSIS_URL.to_string(),
            analysis_timeout_secs: constants::DEFAULT_ANALYSIS_TIMEOUT_SECS,
            analysis_enabled: false,
            pattern_id: constants::DEFAULT_PATTERN_ID.to_string(),
            pattern_file: None,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults with a warning
/// so the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    match read_raw_config(config_path) {
        Ok(raw) => {
            let config = validate(raw, &mut warnings);
            (config, warnings)
        }
        Err(e) => {
            warnings.push(format!("{e}. Using defaults."));
            (AppConfig::default(), warnings)
        }
    }
}

/// Read and deserialise a config file without validating its values.
pub fn read_raw_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source,
    })
}

/// Validate each field against named constants, accumulating all warnings.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Analysis: base_url --
    if let Some(url) = raw.analysis.base_url {
        let trimmed = url.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            config.analysis_url = trimmed.to_string();
        } else {
            warnings.push(format!(
                "[analysis] base_url = \"{url}\" must start with http:// or https://. \
                 Using default ({}).",
                constants::DEFAULT_ANALYSIS_URL,
            ));
        }
    }

    // -- Analysis: timeout_secs --
    if let Some(secs) = raw.analysis.timeout_secs {
        if (constants::MIN_ANALYSIS_TIMEOUT_SECS..=constants::MAX_ANALYSIS_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.analysis_timeout_secs = secs;
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "analysis.timeout_secs".to_string(),
                value: secs.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_ANALYSIS_TIMEOUT_SECS,
                    constants::MAX_ANALYSIS_TIMEOUT_SECS
                ),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_ANALYSIS_TIMEOUT_SECS
            ));
        }
    }

    if let Some(enabled) = raw.analysis.enabled {
        config.analysis_enabled = enabled;
    }

    // -- Parsing: pattern --
    if let Some(id) = raw.parsing.pattern {
        if crate::core::pattern::LinePattern::builtin(&id).is_ok() {
            config.pattern_id = id;
        } else {
            let known: Vec<&str> = crate::core::pattern::LinePattern::builtins()
                .iter()
                .map(|p| p.id())
                .collect();
            warnings.push(format!(
                "[parsing] pattern = \"{id}\" is not a built-in pattern ({}). Using default ({}).",
                known.join(", "),
                constants::DEFAULT_PATTERN_ID,
            ));
        }
    }

    if let Some(file) = raw.parsing.pattern_file.filter(|f| !f.is_empty()) {
        config.pattern_file = Some(PathBuf::from(file));
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    if let Some(file) = raw.logging.file.filter(|f| !f.is_empty()) {
        config.log_file = Some(PathBuf::from(file));
    }

    config
}
