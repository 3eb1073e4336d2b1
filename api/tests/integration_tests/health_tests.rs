//! Integration tests for health check and status endpoints.
//!
//! Tests cover:
//! - Health check endpoint
//! - Status reporting before and after a push

use axum::http::StatusCode;

use super::common::{get, get_text, post_json, push_body, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "coretemp-api");
}

#[tokio::test]
async fn test_empty_collector() {
    let (app, _state) = test_app();

    let (status, response) = get(app.clone(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["tracked_hosts"], 0);
    assert_eq!(response["sweep_interval_secs"], 60);
    assert_eq!(response["stale_after_secs"], 300);

    let (status, text) = get_text(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!text.contains("hostname="));
}

#[tokio::test]
async fn test_status_counts_reporting_hosts() {
    let (app, _state) = test_app();

    for host in ["alpha", "beta", "alpha"] {
        let body = push_body(host, "1", "0", 40.0, 60.0, "2024-05-01T10:00:00Z");
        let (status, _) = post_json(app.clone(), "/hardware-data", body).await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    let (_, response) = get(app, "/api/v1/status").await;
    assert_eq!(response["tracked_hosts"], 2);
}
