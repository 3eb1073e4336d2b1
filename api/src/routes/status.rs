//! Health and status endpoints.
//!
//! `/health` is a liveness probe for load balancers. `/api/v1/status` reports
//! how many hosts have been seen and how the sweeper is configured.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
}

/// Collector status response.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Hosts with a recorded last-seen timestamp.
    pub tracked_hosts: usize,
    /// Seconds between sweep cycles.
    pub sweep_interval_secs: u64,
    /// Seconds of silence after which a host is stale.
    pub stale_after_secs: u64,
}

/// Creates the health and status routes.
pub fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/status", get(collector_status))
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "coretemp-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn collector_status(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let tracked_hosts = state
        .tracker()
        .len()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let staleness = state.staleness();

    Ok(Json(StatusResponse {
        tracked_hosts,
        sweep_interval_secs: staleness.sweep_interval.as_secs(),
        stale_after_secs: staleness.stale_after.as_secs(),
    }))
}
