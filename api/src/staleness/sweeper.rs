//! Stale series sweeping.
//!
//! Periodically retires every gauge series of hosts that stopped reporting.

use chrono::{DateTime, FixedOffset, Utc};
use shared::config::StalenessConfig;
use shared::models::CoreGauge;
use shared::storage::{GaugeStore, GaugeStoreError, TrackerError, UpdateTracker};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// Errors that abort a single sweep cycle.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The staleness window cannot be subtracted from the sweep time.
    #[error("Staleness window out of range: {0:?}")]
    WindowOutOfRange(Duration),

    /// The gauge store failed to enumerate or remove series.
    #[error("Gauge store error: {0}")]
    Store(#[from] GaugeStoreError),

    /// The update tracker could not be read.
    #[error("Update tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// Result of sweeping one metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSweep {
    /// The swept metric.
    pub metric: String,
    /// Distinct hosts found among the metric's series.
    pub hosts_checked: usize,
    /// Hosts judged stale, in name order.
    pub evicted_hosts: Vec<String>,
    /// Series actually removed.
    pub series_removed: usize,
}

/// Result of one sweep cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// Time the cycle was evaluated at.
    pub swept_at: DateTime<FixedOffset>,
    /// Hosts last seen at or before this instant were stale.
    pub cutoff: DateTime<FixedOffset>,
    /// Per-metric results, in tracked order.
    pub metrics: Vec<MetricSweep>,
}

impl SweepReport {
    /// Total series removed across all metrics.
    #[must_use]
    pub fn series_removed(&self) -> usize {
        self.metrics.iter().map(|m| m.series_removed).sum()
    }

    /// Distinct hosts evicted from at least one metric.
    #[must_use]
    pub fn evicted_hosts(&self) -> BTreeSet<&str> {
        self.metrics
            .iter()
            .flat_map(|m| m.evicted_hosts.iter().map(String::as_str))
            .collect()
    }
}

/// Returns true if a host last seen at `last_seen` is stale at `cutoff`.
///
/// Unknown hosts are stale. The bound is closed: `last_seen == cutoff` is stale.
#[must_use]
pub fn is_stale(last_seen: Option<DateTime<FixedOffset>>, cutoff: DateTime<FixedOffset>) -> bool {
    match last_seen {
        Some(time) => time <= cutoff,
        None => true,
    }
}

/// Background sweeper that evicts series of silent hosts.
///
/// The sweeper only reads the tracker; it never clears timestamps.
pub struct StalenessSweeper {
    store: Arc<dyn GaugeStore>,
    tracker: Arc<UpdateTracker>,
    metrics: Vec<String>,
    config: StalenessConfig,
}

impl StalenessSweeper {
    /// Creates a new sweeper.
    ///
    /// # Arguments
    ///
    /// * `store` - Gauge store to evict from
    /// * `tracker` - Source of per-host last-seen timestamps
    /// * `metrics` - Names of the gauges to sweep; all must share the per-core label shape
    /// * `config` - Sweep period and staleness window
    #[must_use]
    pub fn new(
        store: Arc<dyn GaugeStore>,
        tracker: Arc<UpdateTracker>,
        metrics: Vec<String>,
        config: StalenessConfig,
    ) -> Self {
        Self {
            store,
            tracker,
            metrics,
            config,
        }
    }

    /// Creates a sweeper over every [`CoreGauge`] of the application state.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.gauge_store_handle(),
            state.tracker_handle(),
            CoreGauge::tracked_names(),
            state.staleness(),
        )
    }

    /// Returns the swept metric names.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Runs one sweep cycle against the current wall clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or tracker fails.
    pub fn sweep(&self) -> Result<SweepReport, SweepError> {
        self.sweep_at(Utc::now().fixed_offset())
    }

    /// Runs one sweep cycle as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store or tracker fails, or if the staleness
    /// window cannot be subtracted from `now`. Metrics swept before the error
    /// keep their evictions.
    pub fn sweep_at(&self, now: DateTime<FixedOffset>) -> Result<SweepReport, SweepError> {
        let window = self.config.stale_after;
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|w| now.checked_sub_signed(w))
            .ok_or(SweepError::WindowOutOfRange(window))?;

        let mut report = SweepReport {
            swept_at: now,
            cutoff,
            metrics: Vec::with_capacity(self.metrics.len()),
        };
        for metric in &self.metrics {
            report.metrics.push(self.sweep_metric(metric, cutoff)?);
        }
        Ok(report)
    }

    fn sweep_metric(
        &self,
        metric: &str,
        cutoff: DateTime<FixedOffset>,
    ) -> Result<MetricSweep, SweepError> {
        let label_sets = self.store.label_sets(metric)?;
        let hosts: BTreeSet<&str> = label_sets.iter().map(|l| l.host.as_str()).collect();

        let mut outcome = MetricSweep {
            metric: metric.to_string(),
            hosts_checked: hosts.len(),
            evicted_hosts: Vec::new(),
            series_removed: 0,
        };

        for host in hosts {
            let last_seen = self.tracker.last_update(host)?;
            if !is_stale(last_seen, cutoff) {
                continue;
            }

            let mut removed = 0;
            for labels in label_sets.iter().filter(|l| l.host == host) {
                if self.store.remove(metric, labels)? {
                    removed += 1;
                }
            }

            tracing::info!(
                metric,
                host,
                last_seen = ?last_seen,
                series = removed,
                "Evicted series of stale host"
            );
            outcome.series_removed += removed;
            outcome.evicted_hosts.push(host.to_string());
        }

        Ok(outcome)
    }

    /// Starts the sweep loop.
    ///
    /// A cycle runs immediately, then after every full sweep interval. A failed
    /// cycle is logged and the loop still waits the full interval before the
    /// next one.
    ///
    /// # Cancellation
    ///
    /// The token is checked before each cycle and raced against the wait. A
    /// running cycle is never interrupted.
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.sweep_interval.as_secs(),
            stale_after_secs = self.config.stale_after.as_secs(),
            metrics = ?self.metrics,
            "Staleness sweeper started"
        );

        while !shutdown.is_cancelled() {
            match self.sweep() {
                Ok(report) if report.series_removed() > 0 => {
                    tracing::info!(
                        hosts = ?report.evicted_hosts(),
                        series_removed = report.series_removed(),
                        "Stale series sweep completed"
                    );
                }
                Ok(report) => {
                    tracing::debug!(cutoff = %report.cutoff, "Stale series sweep found nothing to evict");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Stale series sweep failed");
                }
            }

            tokio::select! {
                () = shutdown.cancelled() => break,
                () = tokio::time::sleep(self.config.sweep_interval) => {}
            }
        }

        tracing::info!("Staleness sweeper stopped");
    }
}
