//! Storage traits and implementations.
//!
//! This module holds the two pieces of mutable collector state: the exported
//! per-core gauges (`GaugeStore`) and the per-host last-seen timestamps
//! (`UpdateTracker`). Neither references the other.

pub mod gauge_store;
pub mod update_tracker;

pub use gauge_store::{
    GaugeStore, GaugeStoreError, PrometheusGaugeStore, EXPOSITION_CONTENT_TYPE,
};
pub use update_tracker::{TrackerError, UpdateTracker};
