//! Gauge storage trait and implementations.
//!
//! Provides the `GaugeStore` trait for label-keyed per-core gauges and a
//! `PrometheusGaugeStore` implementation backed by a private
//! [`prometheus::Registry`].

use crate::models::{CoreGauge, CoreLabels, CORE_LABEL_NAMES};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashMap;
use thiserror::Error;

/// Content type of the text exposition produced by [`GaugeStore::gather_text`].
pub const EXPOSITION_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Errors that can occur during gauge store operations.
#[derive(Debug, Error)]
pub enum GaugeStoreError {
    /// The metric name is not registered in the store.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// The metric name is already registered.
    #[error("Metric already registered: {0}")]
    DuplicateMetric(String),

    /// The underlying registry rejected the operation.
    #[error("Registry error: {0}")]
    Registry(#[from] prometheus::Error),

    /// The exposition could not be encoded.
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Trait for label-keyed gauge storage.
///
/// Every gauge in a store shares the `(hostname, cpu, core)` label shape.
/// Implementations must be thread-safe (Send + Sync).
pub trait GaugeStore: Send + Sync {
    /// Sets the value of one series, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is unknown or the store rejects the write.
    fn set(&self, metric: &str, labels: &CoreLabels, value: f64) -> Result<(), GaugeStoreError>;

    /// Returns the current value of one series, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is unknown.
    fn get(&self, metric: &str, labels: &CoreLabels) -> Result<Option<f64>, GaugeStoreError>;

    /// Enumerates every currently exported label combination of a metric.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is unknown.
    fn label_sets(&self, metric: &str) -> Result<Vec<CoreLabels>, GaugeStoreError>;

    /// Removes one series. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the metric is unknown.
    fn remove(&self, metric: &str, labels: &CoreLabels) -> Result<bool, GaugeStoreError>;

    /// Renders every gauge in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    fn gather_text(&self) -> Result<String, GaugeStoreError>;
}

/// Gauge store backed by `prometheus` gauge vectors.
pub struct PrometheusGaugeStore {
    registry: Registry,
    gauges: HashMap<String, GaugeVec>,
}

impl PrometheusGaugeStore {
    /// Creates a store with every [`CoreGauge`] registered.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails.
    pub fn new() -> Result<Self, GaugeStoreError> {
        let mut store = Self::empty();
        for gauge in CoreGauge::ALL {
            store.register(gauge.name(), gauge.help())?;
        }
        Ok(store)
    }

    /// Creates a store with no gauges registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            registry: Registry::new(),
            gauges: HashMap::new(),
        }
    }

    /// Registers a gauge with the per-core label shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already registered.
    pub fn register(&mut self, name: &str, help: &str) -> Result<(), GaugeStoreError> {
        if self.gauges.contains_key(name) {
            return Err(GaugeStoreError::DuplicateMetric(name.to_string()));
        }
        let gauge = GaugeVec::new(Opts::new(name, help), &CORE_LABEL_NAMES)?;
        self.registry.register(Box::new(gauge.clone()))?;
        self.gauges.insert(name.to_string(), gauge);
        tracing::debug!(metric = name, "Registered per-core gauge");
        Ok(())
    }

    /// Returns the names of every registered gauge.
    #[must_use]
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.gauges.keys().cloned().collect();
        names.sort();
        names
    }

    fn gauge(&self, metric: &str) -> Result<&GaugeVec, GaugeStoreError> {
        self.gauges
            .get(metric)
            .ok_or_else(|| GaugeStoreError::UnknownMetric(metric.to_string()))
    }

    /// Collects `(labels, value)` for every series of a gauge.
    fn series(&self, metric: &str) -> Result<Vec<(CoreLabels, f64)>, GaugeStoreError> {
        use prometheus::core::Collector;

        let gauge = self.gauge(metric)?;
        let mut series = Vec::new();
        for family in gauge.collect() {
            for sample in family.get_metric() {
                // Label pairs come back sorted by name, so look them up by name
                let value_of = |name: &str| {
                    sample
                        .get_label()
                        .iter()
                        .find(|pair| pair.get_name() == name)
                        .map(|pair| pair.get_value().to_string())
                        .unwrap_or_default()
                };
                let labels = CoreLabels::new(
                    value_of(CORE_LABEL_NAMES[0]),
                    value_of(CORE_LABEL_NAMES[1]),
                    value_of(CORE_LABEL_NAMES[2]),
                );
                series.push((labels, sample.get_gauge().get_value()));
            }
        }
        Ok(series)
    }
}

impl GaugeStore for PrometheusGaugeStore {
    fn set(&self, metric: &str, labels: &CoreLabels, value: f64) -> Result<(), GaugeStoreError> {
        self.gauge(metric)?
            .get_metric_with_label_values(&labels.values())?
            .set(value);
        Ok(())
    }

    fn get(&self, metric: &str, labels: &CoreLabels) -> Result<Option<f64>, GaugeStoreError> {
        Ok(self
            .series(metric)?
            .into_iter()
            .find(|(candidate, _)| candidate == labels)
            .map(|(_, value)| value))
    }

    fn label_sets(&self, metric: &str) -> Result<Vec<CoreLabels>, GaugeStoreError> {
        Ok(self
            .series(metric)?
            .into_iter()
            .map(|(labels, _)| labels)
            .collect())
    }

    fn remove(&self, metric: &str, labels: &CoreLabels) -> Result<bool, GaugeStoreError> {
        // Arity is fixed, so the only failure left is a missing series
        Ok(self
            .gauge(metric)?
            .remove_label_values(&labels.values())
            .is_ok())
    }

    fn gather_text(&self) -> Result<String, GaugeStoreError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| GaugeStoreError::Encoding(e.to_string()))
    }
}
