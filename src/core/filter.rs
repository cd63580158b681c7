// LogLens - core/filter.rs
//
// Composable filter engine for log entries.
// All configured predicates are AND-combined; an unconfigured predicate
// never excludes anything.
// Core layer: pure logic, no I/O.

use crate::core::model::{Level, LogEntry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashSet;

/// Complete filter state. All fields are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    /// Case-insensitive substring searched in `message` only.
    /// `None` or an empty string = no keyword filter.
    pub keyword: Option<String>,

    /// Levels to include (empty = all).
    pub levels: HashSet<Level>,

    /// Start of time range (inclusive). None = no lower bound.
    pub start: Option<DateTime<Utc>>,

    /// End of time range (inclusive). None = no upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl LogFilter {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.active_keyword().is_none()
            && self.levels.is_empty()
            && self.start.is_none()
            && self.end.is_none()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.levels.extend(levels);
        self
    }

    /// Add levels named by a user (`error`, `Warning`, ...). Unknown names
    /// are skipped with a warning rather than rejecting the filter.
    pub fn with_level_names<S: AsRef<str>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        for name in names {
            match name.as_ref().parse::<Level>() {
                Ok(level) => {
                    self.levels.insert(level);
                }
                Err(reason) => tracing::warn!(%reason, "Ignoring unknown level filter"),
            }
        }
        self
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the lower bound from user text. Unparseable text leaves the bound
    /// unset rather than excluding everything.
    pub fn with_start_text(mut self, text: &str) -> Self {
        self.start = parse_bound(text);
        self
    }

    /// Set the upper bound from user text. Unparseable text leaves the bound
    /// unset rather than excluding everything.
    pub fn with_end_text(mut self, text: &str) -> Self {
        self.end = parse_bound(text);
        self
    }

    fn active_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }
}

/// Parse a date bound typed by a user.
///
/// Accepts RFC 3339 (`2024-01-15T10:00:00Z`, any offset), `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` (both read as UTC), and a bare `YYYY-MM-DD`
/// (midnight UTC). Empty or unrecognised text returns `None`.
pub fn parse_bound(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ndt.and_utc());
        }
    }
    if let Some(ndt) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(ndt.and_utc());
    }

    tracing::warn!(input = trimmed, "Ignoring unparseable date bound");
    None
}

/// Apply filters to a slice of entries, returning indices of matching entries.
///
/// Indices are ascending, so the matching entries keep their original order.
/// One linear pass; the keyword is lower-cased once per call.
pub fn apply_filter(entries: &[LogEntry], filter: &LogFilter) -> Vec<usize> {
    if filter.is_empty() {
        return (0..entries.len()).collect();
    }

    let keyword_lower = filter.active_keyword().map(str::to_lowercase);

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_all(entry, filter, keyword_lower.as_deref()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Apply filters and borrow the matching entries, in original order.
pub fn filter_entries<'a>(entries: &'a [LogEntry], filter: &LogFilter) -> Vec<&'a LogEntry> {
    apply_filter(entries, filter)
        .into_iter()
        .map(|idx| &entries[idx])
        .collect()
}

/// Check if a single entry matches all active filters.
fn matches_all(entry: &LogEntry, filter: &LogFilter, keyword_lower: Option<&str>) -> bool {
    if !filter.levels.is_empty() && !filter.levels.contains(&entry.level()) {
        return false;
    }

    let ts = entry.timestamp();
    if filter.start.is_some_and(|start| ts < start) {
        return false;
    }
    if filter.end.is_some_and(|end| ts > end) {
        return false;
    }

    if let Some(keyword) = keyword_lower {
        if !entry.message().to_lowercase().contains(keyword) {
            return false;
        }
    }

    true
}
