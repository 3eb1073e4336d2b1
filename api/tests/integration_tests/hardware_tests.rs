//! Integration tests for hardware pushes and scrapes.
//!
//! Tests cover:
//! - Push then scrape
//! - Overwriting a series with a newer push
//! - Rejection of malformed and invalid payloads

use axum::http::StatusCode;
use chrono::DateTime;
use serde_json::json;

use super::common::{get_text, post_json, post_raw, push_body, series_lines, test_app};

#[tokio::test]
async fn test_push_then_scrape() {
    let (app, state) = test_app();

    let body = push_body("rig-01", "1", "3", 55.0, 45.0, "2024-05-01T10:00:00+02:00");
    let (status, response) = post_json(app.clone(), "/hardware-data", body).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(response["accepted"], 2);

    let (status, text) = get_text(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series_lines(&text, "cpu_core_temperature", "rig-01"), 1);
    assert_eq!(series_lines(&text, "cpu_core_distance_to_tj_max", "rig-01"), 1);
    assert!(text.contains(r#"core="3""#));

    let seen = state.tracker().last_update("rig-01").unwrap();
    assert_eq!(
        seen,
        Some(DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap())
    );
}

#[tokio::test]
async fn test_newer_push_overwrites_value() {
    let (app, state) = test_app();

    let first = push_body("rig-01", "1", "0", 50.0, 50.0, "2024-05-01T10:00:00Z");
    let second = push_body("rig-01", "1", "0", 72.5, 27.5, "2024-05-01T10:01:00Z");
    post_json(app.clone(), "/hardware-data", first).await;
    let (status, _) = post_json(app, "/hardware-data", second).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let labels = shared::models::CoreLabels::new("rig-01", "1", "0");
    let value = state
        .gauge_store()
        .get("cpu_core_temperature", &labels)
        .unwrap();
    assert_eq!(value, Some(72.5));
    assert_eq!(state.gauge_store().label_sets("cpu_core_temperature").unwrap().len(), 1);
}

#[tokio::test]
async fn test_camel_case_payload_is_accepted() {
    let (app, _state) = test_app();

    let body = json!({
        "hostName": "laptop",
        "cpus": {"1": {"cores": {"0": {
            "temperature": {"value": 61.0, "time": "2024-05-01T10:00:00Z"}
        }}}}
    });
    let (status, response) = post_json(app, "/hardware-data", body).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(response["accepted"], 1);
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (app, state) = test_app();

    let (status, response) = post_raw(app, "/hardware-data", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_json");
    assert!(state.tracker().is_empty().unwrap());
}

#[tokio::test]
async fn test_empty_host_name_returns_400() {
    let (app, state) = test_app();

    let body = push_body("", "1", "0", 50.0, 50.0, "2024-05-01T10:00:00Z");
    let (status, response) = post_json(app, "/hardware-data", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");
    assert!(state.tracker().is_empty().unwrap());
}
