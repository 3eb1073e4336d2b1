//! Hardware telemetry ingestion endpoint.
//!
//! Accepts pushes of per-core CPU readings from reporting hosts.

use crate::ingest::apply_push;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{PushMetricsRequest, PushMetricsResponse};

/// Error response for a rejected push.
#[derive(Debug, Serialize, Deserialize)]
pub struct HardwareDataError {
    /// Error type.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

type HandlerError = (StatusCode, Json<HardwareDataError>);

fn reject(status: StatusCode, error: &str, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(HardwareDataError {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Creates the hardware ingestion routes.
pub fn hardware_routes(state: AppState) -> Router {
    Router::new()
        .route("/hardware-data", post(ingest_hardware_data))
        .with_state(state)
}

/// Handler for hardware pushes.
///
/// Returns 202 Accepted on success, 400 Bad Request for malformed or invalid
/// payloads, 500 if the collector state could not be updated.
async fn ingest_hardware_data(
    State(state): State<AppState>,
    payload: Result<Json<PushMetricsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PushMetricsResponse>), HandlerError> {
    let Json(request) = payload
        .map_err(|rejection| reject(StatusCode::BAD_REQUEST, "invalid_json", rejection.body_text()))?;

    request
        .validate_request()
        .map_err(|e| reject(StatusCode::BAD_REQUEST, "validation_error", e.to_string()))?;

    let summary = apply_push(&state, &request).map_err(|e| {
        tracing::error!(host = %request.host_name, error = %e, "Failed to apply hardware push");
        reject(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", e.to_string())
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(PushMetricsResponse {
            accepted: summary.applied,
            message: format!(
                "Accepted {} reading(s) from {}",
                summary.applied, request.host_name
            ),
        }),
    ))
}
