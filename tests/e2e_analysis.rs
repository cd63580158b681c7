// LogLens - tests/e2e_analysis.rs
//
// End-to-end tests for the analysis client against an in-process HTTP
// service. Each test binds an axum router to an ephemeral port on
// 127.0.0.1 and talks to it through the real reqwest client.

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use loglens::app::session::{AnalysisState, Session};
use loglens::core::ingest::ingest;
use loglens::core::pattern::LinePattern;
use loglens::core::report::render_report;
use loglens::platform::analysis::AnalysisClient;
use loglens::util::error::AnalysisError;
use serde_json::{json, Value};
use std::time::Duration;

const SCENARIO: &str = "2024-01-15 10:00:00 [ERROR] disk failure\n\
                        garbage line\n\
                        2024-01-15 10:05:00 [INFO] recovered\n";

// =============================================================================
// Helpers
// =============================================================================

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> AnalysisClient {
    AnalysisClient::new(base_url, Duration::from_secs(5)).unwrap()
}

/// Minimal stand-in for the analysis service: counts what it receives.
async fn count_levels(Json(entries): Json<Vec<Value>>) -> Json<Value> {
    let total = entries.len();
    let errors = entries.iter().filter(|e| e["level"] == "ERROR").count();
    let mut by_level = serde_json::Map::new();
    for entry in &entries {
        let level = entry["level"].as_str().unwrap_or("?").to_string();
        let count = by_level.get(&level).and_then(Value::as_u64).unwrap_or(0);
        by_level.insert(level, json!(count + 1));
    }
    Json(json!({
        "total_entries": total,
        "by_level": by_level,
        "error_rate": errors as f64 / total.max(1) as f64,
        "patterns": [{"pattern": "disk failure", "occurrences": 1, "examples": ["disk failure"]}],
        "time_series": [{"timestamp": entries[0]["timestamp"], "count": total, "error_count": errors}],
        "anomalies": [],
        "processing_time": "3ms"
    }))
}

// =============================================================================
// /api/analyze
// =============================================================================

#[tokio::test]
async fn e2e_analyze_round_trip() {
    let base = spawn_service(Router::new().route("/api/analyze", post(count_levels))).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let result = client(&base).analyze(&entries).await.unwrap();
    assert_eq!(result.total_entries, 2);
    assert_eq!(result.by_level.get("ERROR"), Some(&1));
    assert_eq!(result.by_level.get("INFO"), Some(&1));
    assert!((result.error_rate - 0.5).abs() < f64::EPSILON);
    assert_eq!(result.time_series[0].timestamp, entries[0].timestamp_text());

    let report = render_report(&result);
    assert!(report.starts_with("Total entries: 2    Error rate: 50.00%    Processing time: 3ms\n"));
    assert!(report.contains("disk failure (1 occurrences)"));
}

#[tokio::test]
async fn e2e_analyze_accepts_response_without_optional_sections() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async { Json(json!({"total_entries": 2, "error_rate": 0.5})) }),
    );
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let result = client(&base).analyze(&entries).await.unwrap();
    assert!(result.time_series.is_empty());
    assert_eq!(
        render_report(&result),
        "Total entries: 2    Error rate: 50.00%\n"
    );
}

#[tokio::test]
async fn e2e_analyze_error_status_is_reported() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal boom") }),
    );
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let err = client(&base).analyze(&entries).await.unwrap_err();
    match err {
        AnalysisError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal boom");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn e2e_analyze_malformed_body_is_format_error() {
    let router = Router::new()
        .route("/api/analyze", post(|| async { "definitely not json" }));
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let err = client(&base).analyze(&entries).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Format { .. }), "{err:?}");
}

#[tokio::test]
async fn e2e_analyze_missing_required_field_is_format_error() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async { Json(json!({"by_level": {"ERROR": 1}})) }),
    );
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let err = client(&base).analyze(&entries).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Format { .. }), "{err:?}");
}

#[tokio::test]
async fn e2e_unreachable_service_is_transport_error() {
    // Bind then drop to obtain a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let entries = ingest(SCENARIO, &LinePattern::default());
    let err = client(&format!("http://{addr}"))
        .analyze(&entries)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn e2e_slow_service_times_out() {
    let router = Router::new().route(
        "/api/analyze",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"total_entries": 0, "error_rate": 0.0}))
        }),
    );
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let slow_client = AnalysisClient::new(&base, Duration::from_millis(200)).unwrap();
    let err = slow_client.analyze(&entries).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Timeout { .. }), "{err:?}");
}

// =============================================================================
// /api/analyze/ai
// =============================================================================

#[tokio::test]
async fn e2e_summary_returns_analysis_text() {
    let router = Router::new().route(
        "/api/analyze/ai",
        post(|Json(entries): Json<Vec<Value>>| async move {
            Json(json!({"analysis": format!("{} entries, one disk failure", entries.len())}))
        }),
    );
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let text = client(&base).summarize(&entries).await.unwrap();
    assert_eq!(text, "2 entries, one disk failure");
}

#[tokio::test]
async fn e2e_summary_without_analysis_field_is_format_error() {
    let router = Router::new().route(
        "/api/analyze/ai",
        post(|| async { Json(json!({"summary": "wrong key"})) }),
    );
    let base = spawn_service(router).await;
    let entries = ingest(SCENARIO, &LinePattern::default());

    let err = client(&base).summarize(&entries).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Format { .. }), "{err:?}");
}

// =============================================================================
// Session + client
// =============================================================================

#[tokio::test]
async fn e2e_session_applies_analysis_and_survives_failure() {
    let base = spawn_service(Router::new().route("/api/analyze", post(count_levels))).await;
    let client = client(&base);
    let mut session = Session::default();

    let token = session.load_text(SCENARIO).unwrap();
    let result = client.analyze(session.entries()).await;
    assert!(session.apply_analysis(token, result));
    match session.analysis() {
        AnalysisState::Ready(result) => assert_eq!(result.total_entries, 2),
        other => panic!("expected Ready, got {other:?}"),
    }

    // A second batch against a service that no longer answers.
    let dead = AnalysisClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let token = session
        .load_text("2024-01-16 08:00:00 [WARN] low disk space\n")
        .unwrap();
    let result = dead.analyze(session.entries()).await;
    assert!(session.apply_analysis(token, result));
    assert!(matches!(session.analysis(), AnalysisState::Failed(_)));
    assert_eq!(session.visible_entries().len(), 1);
    assert_eq!(session.visible_entries()[0].message(), "low disk space");
}
