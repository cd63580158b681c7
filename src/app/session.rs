// LogLens - app/session.rs
//
// Session controller: owns the current batch, the active filter, and the
// analysis overlays, and decides which asynchronous responses may still be
// applied.
//
// Every request gets a fresh token, and only the latest token of each kind
// (analysis, summary) may be applied. A load invalidates both kinds, so a
// response for a replaced batch is dropped. Filtering issues no token, so
// an analysis computed for the full batch stays valid while the visible
// subset changes.

use crate::core::filter::{apply_filter, LogFilter};
use crate::core::ingest::ingest_with_stats;
use crate::core::model::{AnalysisResult, IngestStats, LogEntry};
use crate::core::pattern::LinePattern;
use crate::util::error::AnalysisError;

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// State of the aggregate analysis overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// No request outstanding (empty batch or nothing loaded yet).
    Idle,
    Pending,
    Ready(AnalysisResult),
    /// The request failed; the entries are unaffected.
    Failed(String),
}

/// State of the free-text summary overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryState {
    Idle,
    Pending,
    Ready(String),
    Failed(String),
}

/// The active batch and everything derived from it.
#[derive(Debug)]
pub struct Session {
    pattern: LinePattern,
    entries: Vec<LogEntry>,
    stats: IngestStats,
    filter: LogFilter,
    /// Indices into `entries` matching `filter`, in batch order.
    visible: Vec<usize>,
    analysis: AnalysisState,
    summary: SummaryState,
    /// Id of the last token issued, of any kind.
    last_request: u64,
    analysis_request: Option<RequestToken>,
    summary_request: Option<RequestToken>,
}

impl Session {
    pub fn new(pattern: LinePattern) -> Self {
        Self {
            pattern,
            entries: Vec::new(),
            stats: IngestStats::default(),
            filter: LogFilter::default(),
            visible: Vec::new(),
            analysis: AnalysisState::Idle,
            summary: SummaryState::Idle,
            last_request: 0,
            analysis_request: None,
            summary_request: None,
        }
    }

    /// Replace the batch with the entries parsed from `raw`.
    ///
    /// The current filter is kept and re-applied. Returns the token for the
    /// analysis request to issue, or `None` when the batch is empty and no
    /// request should be made.
    pub fn load_text(&mut self, raw: &str) -> Option<RequestToken> {
        let (entries, stats) = ingest_with_stats(raw, &self.pattern);
        self.entries = entries;
        self.stats = stats;
        self.recompute_visible();
        self.summary = SummaryState::Idle;
        self.summary_request = None;

        tracing::info!(
            entries = self.stats.entries,
            skipped = self.stats.lines_skipped,
            "{} lines ingested",
            self.stats.entries
        );

        if self.entries.is_empty() {
            self.analysis = AnalysisState::Idle;
            self.analysis_request = None;
            None
        } else {
            self.analysis = AnalysisState::Pending;
            let token = self.issue();
            self.analysis_request = Some(token);
            Some(token)
        }
    }

    /// Replace the active filter and recompute the visible subset.
    pub fn set_filter(&mut self, filter: LogFilter) {
        self.filter = filter;
        self.recompute_visible();
        tracing::debug!(
            visible = self.visible.len(),
            total = self.entries.len(),
            "Filter applied"
        );
    }

    /// Entries matching the active filter, in batch order.
    pub fn visible_entries(&self) -> Vec<&LogEntry> {
        self.visible
            .iter()
            .filter_map(|&idx| self.entries.get(idx))
            .collect()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    pub fn pattern(&self) -> &LinePattern {
        &self.pattern
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn summary(&self) -> &SummaryState {
        &self.summary
    }

    /// Apply the outcome of an analysis request.
    ///
    /// Returns `false` (and changes nothing) when `token` is not the latest.
    pub fn apply_analysis(
        &mut self,
        token: RequestToken,
        result: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if self.analysis_request != Some(token) {
            tracing::debug!(token = token.0, "Dropping stale analysis response");
            return false;
        }
        self.analysis = match result {
            Ok(result) => AnalysisState::Ready(result),
            Err(e) => {
                tracing::warn!(error = %e, "Analysis failed; entries remain available");
                AnalysisState::Failed(e.to_string())
            }
        };
        true
    }

    /// Issue a token for a summary request on the current batch.
    ///
    /// Returns `None` when there is nothing to summarise.
    pub fn request_summary(&mut self) -> Option<RequestToken> {
        if self.entries.is_empty() {
            return None;
        }
        self.summary = SummaryState::Pending;
        let token = self.issue();
        self.summary_request = Some(token);
        Some(token)
    }

    /// Apply the outcome of a summary request. Only the most recent
    /// `request_summary` token is accepted.
    pub fn apply_summary(
        &mut self,
        token: RequestToken,
        result: Result<String, AnalysisError>,
    ) -> bool {
        if self.summary_request != Some(token) {
            tracing::debug!(token = token.0, "Dropping stale summary response");
            return false;
        }
        self.summary = match result {
            Ok(text) => SummaryState::Ready(text),
            Err(e) => {
                tracing::warn!(error = %e, "Summary failed");
                SummaryState::Failed(e.to_string())
            }
        };
        true
    }

    // ---- private helpers ----

    fn issue(&mut self) -> RequestToken {
        self.last_request += 1;
        RequestToken(self.last_request)
    }

    fn recompute_visible(&mut self) {
        self.visible = apply_filter(&self.entries, &self.filter);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LinePattern::default())
    }
}
