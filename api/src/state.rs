//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers and
//! to the staleness sweeper.

use shared::config::StalenessConfig;
use shared::storage::{GaugeStore, GaugeStoreError, PrometheusGaugeStore, UpdateTracker};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// The gauge store and the update tracker are independent; handlers write to
/// both, the sweeper reads the tracker and evicts from the store.
#[derive(Clone)]
pub struct AppState {
    /// The exported per-core gauges.
    gauge_store: Arc<dyn GaugeStore>,
    /// Last-seen timestamps by host.
    tracker: Arc<UpdateTracker>,
    /// Sweep timing, reported by the status endpoint.
    staleness: StalenessConfig,
}

impl AppState {
    /// Creates a new application state with the given components.
    pub fn new(
        gauge_store: Arc<dyn GaugeStore>,
        tracker: Arc<UpdateTracker>,
        staleness: StalenessConfig,
    ) -> Self {
        Self {
            gauge_store,
            tracker,
            staleness,
        }
    }

    /// Creates a new application state backed by a fresh Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the gauges cannot be registered.
    pub fn with_prometheus_store(staleness: StalenessConfig) -> Result<Self, GaugeStoreError> {
        Ok(Self::new(
            Arc::new(PrometheusGaugeStore::new()?),
            Arc::new(UpdateTracker::new()),
            staleness,
        ))
    }

    /// Returns a reference to the gauge store.
    #[must_use]
    pub fn gauge_store(&self) -> &dyn GaugeStore {
        self.gauge_store.as_ref()
    }

    /// Returns a shared handle to the gauge store.
    #[must_use]
    pub fn gauge_store_handle(&self) -> Arc<dyn GaugeStore> {
        Arc::clone(&self.gauge_store)
    }

    /// Returns a reference to the update tracker.
    #[must_use]
    pub fn tracker(&self) -> &UpdateTracker {
        self.tracker.as_ref()
    }

    /// Returns a shared handle to the update tracker.
    #[must_use]
    pub fn tracker_handle(&self) -> Arc<UpdateTracker> {
        Arc::clone(&self.tracker)
    }

    /// Returns the sweep timing.
    #[must_use]
    pub fn staleness(&self) -> StalenessConfig {
        self.staleness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{CoreGauge, CoreLabels};

    #[test]
    fn test_app_state_with_prometheus_store() {
        let state = AppState::with_prometheus_store(StalenessConfig::default()).unwrap();

        let labels = CoreLabels::new("host", "1", "0");
        state
            .gauge_store()
            .set(CoreGauge::Temperature.name(), &labels, 40.0)
            .unwrap();
        assert_eq!(
            state
                .gauge_store()
                .label_sets(CoreGauge::Temperature.name())
                .unwrap()
                .len(),
            1
        );

        state
            .tracker()
            .record_update("host", Utc::now().fixed_offset())
            .unwrap();
        assert_eq!(state.tracker().len().unwrap(), 1);
    }

    #[test]
    fn test_app_state_is_clone() {
        let state = AppState::with_prometheus_store(StalenessConfig::default()).unwrap();
        let state2 = state.clone();

        // Both should share the same components
        state
            .tracker()
            .record_update("host", Utc::now().fixed_offset())
            .unwrap();

        assert_eq!(state2.tracker().len().unwrap(), 1);
        assert!(Arc::ptr_eq(&state.tracker_handle(), &state2.tracker_handle()));
    }
}
