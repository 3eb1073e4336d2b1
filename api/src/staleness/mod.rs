//! Stale series management.
//!
//! This module retires the gauge series of hosts that stopped pushing, so
//! scrapers never see frozen temperatures for machines that went away.

pub mod sweeper;

pub use sweeper::{is_stale, MetricSweep, StalenessSweeper, SweepError, SweepReport};
