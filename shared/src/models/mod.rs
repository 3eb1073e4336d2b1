//! Data models for the Coretemp collector.
//!
//! This module contains the push payload and the identities of exported gauges.

pub mod gauge;
pub mod hardware;

pub use gauge::{CoreGauge, CoreLabels, CORE_LABEL_NAMES};
pub use hardware::{
    CoreReport, CpuReport, Observation, PayloadValidationError, PushMetricsRequest,
    PushMetricsResponse, Reading,
};
