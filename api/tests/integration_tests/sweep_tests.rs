//! Integration tests for stale series eviction.
//!
//! Tests cover:
//! - A silent host disappears from the scrape while a fresh host stays
//! - A retired host comes back on its next push

use api::staleness::StalenessSweeper;
use axum::http::StatusCode;
use chrono::{DateTime, Duration};

use super::common::{get_text, post_json, push_body, series_lines, test_app};

#[tokio::test]
async fn test_silent_host_is_retired_from_scrape() {
    let (app, state) = test_app();
    let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap();
    let six_minutes_ago = (now - Duration::minutes(6)).to_rfc3339();
    let four_minutes_ago = (now - Duration::minutes(4)).to_rfc3339();

    post_json(
        app.clone(),
        "/hardware-data",
        push_body("silent", "1", "0", 50.0, 50.0, &six_minutes_ago),
    )
    .await;
    post_json(
        app.clone(),
        "/hardware-data",
        push_body("chatty", "1", "0", 45.0, 55.0, &four_minutes_ago),
    )
    .await;

    let sweeper = StalenessSweeper::from_state(&state);
    let report = sweeper.sweep_at(now).unwrap();
    assert_eq!(report.series_removed(), 2);
    assert_eq!(report.evicted_hosts().into_iter().collect::<Vec<_>>(), vec!["silent"]);

    let (status, text) = get_text(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series_lines(&text, "cpu_core_temperature", "silent"), 0);
    assert_eq!(series_lines(&text, "cpu_core_distance_to_tj_max", "silent"), 0);
    assert_eq!(series_lines(&text, "cpu_core_temperature", "chatty"), 1);
    assert_eq!(series_lines(&text, "cpu_core_distance_to_tj_max", "chatty"), 1);

    // The tracker keeps the last-seen timestamp of retired hosts
    assert!(state.tracker().last_update("silent").unwrap().is_some());
}

#[tokio::test]
async fn test_retired_host_returns_on_next_push() {
    let (app, state) = test_app();
    let now = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z").unwrap();
    let stale = (now - Duration::minutes(10)).to_rfc3339();

    post_json(
        app.clone(),
        "/hardware-data",
        push_body("rig", "1", "0", 50.0, 50.0, &stale),
    )
    .await;

    let sweeper = StalenessSweeper::from_state(&state);
    sweeper.sweep_at(now).unwrap();
    let (_, text) = get_text(app.clone(), "/metrics").await;
    assert_eq!(series_lines(&text, "cpu_core_temperature", "rig"), 0);

    let (status, _) = post_json(
        app.clone(),
        "/hardware-data",
        push_body("rig", "1", "0", 52.0, 48.0, &now.to_rfc3339()),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    sweeper.sweep_at(now).unwrap();
    let (_, text) = get_text(app, "/metrics").await;
    assert_eq!(series_lines(&text, "cpu_core_temperature", "rig"), 1);
}
