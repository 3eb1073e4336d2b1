//! Applies pushed hardware readings to the collector state.
//!
//! Every reading is written in two steps: the gauge value first, then the
//! host's last-seen timestamp. A failed gauge write leaves the tracker
//! untouched for that reading.
//!
//! The two steps are not atomic. A sweep landing between them sees the new
//! series without a timestamp for a first-time host and evicts it; the next
//! push restores it. Keep the gauge write first: recording the timestamp
//! before a failed gauge write would mark a host fresh that exports nothing.

use chrono::{DateTime, FixedOffset};
use shared::models::PushMetricsRequest;
use shared::storage::{GaugeStoreError, TrackerError};
use thiserror::Error;

use crate::state::AppState;

/// Errors that can occur while applying a push.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Writing a gauge value failed.
    #[error("Failed to store gauge value: {0}")]
    Store(#[from] GaugeStoreError),

    /// Recording the host timestamp failed.
    #[error("Failed to record host update: {0}")]
    Tracker(#[from] TrackerError),
}

/// Outcome of an applied push.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    /// Number of readings applied.
    pub applied: usize,
    /// Timestamp recorded for the host by the last applied reading.
    pub last_recorded: Option<DateTime<FixedOffset>>,
}

/// Applies every reading of `request` to the gauge store and the tracker.
///
/// Readings are applied in [`PushMetricsRequest::observations`] order, so the
/// tracker ends up holding the timestamp of the last reading in that order.
///
/// # Errors
///
/// Returns an error at the first reading whose gauge write or tracker update
/// fails. Readings applied before it stay applied.
pub fn apply_push(
    state: &AppState,
    request: &PushMetricsRequest,
) -> Result<IngestSummary, IngestError> {
    let mut summary = IngestSummary {
        applied: 0,
        last_recorded: None,
    };

    for observation in request.observations() {
        state.gauge_store().set(
            observation.gauge.name(),
            &observation.labels,
            observation.reading.value,
        )?;
        state
            .tracker()
            .record_update(&observation.labels.host, observation.reading.time)?;

        summary.applied += 1;
        summary.last_recorded = Some(observation.reading.time);
    }

    tracing::debug!(
        host = %request.host_name,
        applied = summary.applied,
        "Applied hardware push"
    );

    Ok(summary)
}
