//! Staleness configuration for gauge series eviction.
//!
//! Defines how often the collector sweeps for silent hosts and how long a host
//! may stay silent before its series are retired.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default sweep period in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Default staleness window in seconds.
pub const DEFAULT_STALE_AFTER_SECS: u64 = 300;

/// Largest accepted staleness window (one week).
pub const MAX_STALE_AFTER_SECS: u64 = 7 * 24 * 60 * 60;

/// Errors returned by [`StalenessConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StalenessConfigError {
    /// The sweep interval is zero.
    #[error("Sweep interval must be greater than zero")]
    ZeroSweepInterval,

    /// The staleness window is zero.
    #[error("Staleness window must be greater than zero")]
    ZeroStaleAfter,

    /// The staleness window exceeds [`MAX_STALE_AFTER_SECS`].
    #[error("Staleness window cannot exceed 604800 seconds")]
    StaleAfterTooLong,
}

/// Timing of the stale series sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StalenessConfig {
    /// Wait between two sweep cycles.
    pub sweep_interval: Duration,
    /// A host whose last update is at or before `now - stale_after` is stale.
    pub stale_after: Duration,
}

impl StalenessConfig {
    /// Creates a new staleness configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::config::StalenessConfig;
    /// use std::time::Duration;
    ///
    /// let config = StalenessConfig::from_secs(30, 120);
    /// assert_eq!(config.sweep_interval, Duration::from_secs(30));
    /// assert_eq!(config.stale_after, Duration::from_secs(120));
    /// ```
    #[must_use]
    pub fn new(sweep_interval: Duration, stale_after: Duration) -> Self {
        Self {
            sweep_interval,
            stale_after,
        }
    }

    /// Creates a configuration from whole seconds.
    #[must_use]
    pub fn from_secs(sweep_interval_secs: u64, stale_after_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(sweep_interval_secs),
            Duration::from_secs(stale_after_secs),
        )
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either duration is zero
    /// - The staleness window exceeds one week
    pub fn validate(&self) -> Result<(), StalenessConfigError> {
        if self.sweep_interval.is_zero() {
            return Err(StalenessConfigError::ZeroSweepInterval);
        }
        if self.stale_after.is_zero() {
            return Err(StalenessConfigError::ZeroStaleAfter);
        }
        if self.stale_after > Duration::from_secs(MAX_STALE_AFTER_SECS) {
            return Err(StalenessConfigError::StaleAfterTooLong);
        }
        Ok(())
    }
}

impl Default for StalenessConfig {
    /// Returns the default configuration:
    /// - Sweep every 60 seconds
    /// - Retire hosts silent for 5 minutes
    fn default() -> Self {
        Self::from_secs(DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_STALE_AFTER_SECS)
    }
}
