//! Coretemp Shared Library
//!
//! This crate contains the types shared by the Coretemp collector and its
//! push agent.
//!
//! # Modules
//!
//! - [`models`] - Push payload and gauge identities
//! - [`storage`] - Gauge store and per-host update tracking
//! - [`config`] - Stale series eviction settings
//!
//! # Example
//!
//! ```
//! use shared::models::{CoreGauge, PushMetricsRequest, Reading};
//!
//! let time = chrono::Local::now().fixed_offset();
//! let request = PushMetricsRequest::new("workstation")
//!     .with_reading("1", "0", CoreGauge::Temperature, Reading::new(47.0, time));
//!
//! assert!(request.validate_request().is_ok());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod models;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
