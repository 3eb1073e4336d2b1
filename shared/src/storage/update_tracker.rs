//! Last-seen tracking for reporting hosts.
//!
//! The tracker keeps exactly one timestamp per host. Writes overwrite and
//! never enforce ordering; the most recent call wins.

use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors that can occur during update tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to acquire lock on the tracker.
    #[error("Failed to acquire lock on update tracker")]
    LockError,
}

/// Concurrency-safe map from host identifier to last-seen timestamp.
#[derive(Debug, Default)]
pub struct UpdateTracker {
    last_seen: RwLock<HashMap<String, DateTime<FixedOffset>>>,
}

impl UpdateTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the last-seen timestamp of `host` to `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn record_update(
        &self,
        host: &str,
        time: DateTime<FixedOffset>,
    ) -> Result<(), TrackerError> {
        let mut last_seen = self
            .last_seen
            .write()
            .map_err(|_| TrackerError::LockError)?;
        if let Some(slot) = last_seen.get_mut(host) {
            *slot = time;
        } else {
            last_seen.insert(host.to_string(), time);
        }
        Ok(())
    }

    /// Returns the last recorded timestamp of `host`, or `None` if it never reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn last_update(&self, host: &str) -> Result<Option<DateTime<FixedOffset>>, TrackerError> {
        let last_seen = self
            .last_seen
            .read()
            .map_err(|_| TrackerError::LockError)?;
        Ok(last_seen.get(host).copied())
    }

    /// Returns the number of hosts with a recorded timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize, TrackerError> {
        let last_seen = self
            .last_seen
            .read()
            .map_err(|_| TrackerError::LockError)?;
        Ok(last_seen.len())
    }

    /// Returns true if no host has reported yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, TrackerError> {
        Ok(self.len()? == 0)
    }
}
