// LogLens - platform/analysis.rs
//
// HTTP client for the external analysis service.
//
// Endpoints (relative to the configured base URL):
//   POST /api/analyze     body: JSON array of entries -> AnalysisResult
//   POST /api/analyze/ai  body: JSON array of entries -> {"analysis": "<text>"}
//
// One request per call, no internal retry. Every failure is returned as an
// `AnalysisError`; the caller decides whether to report or retry.

use crate::core::model::{AnalysisResult, LogEntry};
use crate::util::constants;
use crate::util::error::AnalysisError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// HTTP client for one analysis service instance.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

/// Body of a successful AI summary response.
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    analysis: Option<String>,
}

impl AnalysisClient {
    /// Create a client for the service at `base_url` (e.g. `http://host:8080`).
    ///
    /// `timeout` bounds each request from connect to the end of the body.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalysisError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        match reqwest::Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(AnalysisError::InvalidUrl {
                    url: base_url.to_string(),
                })
            }
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AnalysisError::Transport)?;

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a batch for aggregate analysis.
    pub async fn analyze(&self, entries: &[LogEntry]) -> Result<AnalysisResult, AnalysisError> {
        tracing::info!(
            entries = entries.len(),
            url = %self.base_url,
            "Requesting analysis"
        );
        let result: AnalysisResult = self.post_json(constants::ANALYZE_PATH, entries).await?;
        tracing::info!(
            total = result.total_entries,
            patterns = result.patterns.len(),
            anomalies = result.anomalies.len(),
            "Analysis received"
        );
        Ok(result)
    }

    /// Ask the service for a free-text summary of a batch.
    pub async fn summarize(&self, entries: &[LogEntry]) -> Result<String, AnalysisError> {
        tracing::info!(
            entries = entries.len(),
            url = %self.base_url,
            "Requesting AI summary"
        );
        let response: SummaryResponse = self.post_json(constants::SUMMARY_PATH, entries).await?;
        response.analysis.ok_or_else(|| AnalysisError::Format {
            reason: "missing string field 'analysis'".to_string(),
        })
    }

    // ---- private helpers ----

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `entries` as JSON and decode a successful JSON response.
    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        entries: &[LogEntry],
    ) -> Result<T, AnalysisError> {
        let url = self.endpoint(path);
        let response = self
            .client
            .post(&url)
            .json(entries)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(constants::MAX_ERROR_BODY_CHARS).collect();
            tracing::warn!(url = %url, status = status.as_u16(), "Analysis service returned an error status");
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.request_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Analysis response did not decode");
            AnalysisError::Format {
                reason: e.to_string(),
            }
        })
    }

    fn request_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            tracing::warn!(timeout_secs = self.timeout.as_secs(), "Analysis request timed out");
            AnalysisError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            tracing::warn!(error = %e, "Analysis request failed");
            AnalysisError::Transport(e)
        }
    }
}
