//! API route definitions.
//!
//! This module organizes all HTTP routes for the Coretemp collector.

mod hardware;
mod metrics;
mod status;

pub use hardware::hardware_routes;
pub use metrics::metrics_routes;
pub use status::status_routes;
