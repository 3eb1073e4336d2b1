//! Configuration module for Coretemp.
//!
//! This module contains configuration structures for stale series eviction.

pub mod staleness;

pub use staleness::{StalenessConfig, StalenessConfigError};
