//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shared::config::StalenessConfig;

/// Creates a test router with a fresh gauge registry and tracker.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_prometheus_store(StalenessConfig::default()).unwrap();
    let router = create_router(state.clone());
    (router, state)
}

/// Builds a push for a single core using the agent's PascalCase field names.
pub fn push_body(host: &str, cpu: &str, core: &str, temp: f64, distance: f64, time: &str) -> Value {
    json!({
        "HostName": host,
        "CPUs": {
            cpu: {
                "Name": "Test CPU",
                "Cores": {
                    core: {
                        "Temperature": {"Value": temp, "Time": time},
                        "DistanceToTJMax": {"Value": distance, "Time": time}
                    }
                }
            }
        }
    })
}

/// Helper to make a POST request with JSON body.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, serde_json::to_string(&body).unwrap()).await
}

/// Helper to POST an arbitrary body, which may not be valid JSON.
pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request and parse a JSON body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, text) = get_text(app, uri).await;
    let json: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
    (status, json)
}

/// Helper to make a GET request and return the raw body text.
pub async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Counts exposition lines for `metric` that carry `hostname="<host>"`.
pub fn series_lines(text: &str, metric: &str, host: &str) -> usize {
    let prefix = format!("{metric}{{");
    let host_label = format!("hostname=\"{host}\"");
    text.lines()
        .filter(|line| line.starts_with(&prefix) && line.contains(&host_label))
        .count()
}
