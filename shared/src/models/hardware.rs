//! Hardware telemetry payload pushed by reporting hosts.
//!
//! The wire format is camelCase JSON. The PascalCase field names written by
//! older agents are accepted as aliases.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use validator::Validate;

use super::gauge::{CoreGauge, CoreLabels};

/// A sensor value together with the instant it was measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Measured value in degrees Celsius.
    #[serde(alias = "Value")]
    pub value: f64,
    /// Measurement time on the reporting host.
    #[serde(alias = "Time")]
    pub time: DateTime<FixedOffset>,
}

impl Reading {
    /// Creates a new reading.
    #[must_use]
    pub fn new(value: f64, time: DateTime<FixedOffset>) -> Self {
        Self { value, time }
    }
}

/// Readings for one CPU core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreReport {
    /// Core temperature.
    #[serde(default, alias = "Temperature", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Reading>,
    /// Distance to the maximum junction temperature.
    #[serde(
        default,
        alias = "DistanceToTJMax",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_to_tj_max: Option<Reading>,
}

impl CoreReport {
    /// Returns the reading for the given gauge, if present.
    #[must_use]
    pub fn reading(&self, gauge: CoreGauge) -> Option<Reading> {
        match gauge {
            CoreGauge::Temperature => self.temperature,
            CoreGauge::DistanceToTjMax => self.distance_to_tj_max,
        }
    }
}

/// Readings for one CPU package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuReport {
    /// Hardware name of the CPU, informational only.
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Core readings keyed by core index.
    #[serde(default, alias = "Cores")]
    pub cores: BTreeMap<String, CoreReport>,
}

/// A push of hardware telemetry from one host.
///
/// # Example
///
/// ```
/// use shared::models::PushMetricsRequest;
///
/// let json = r#"{
///     "hostName": "workstation",
///     "cpus": {
///         "1": { "cores": { "0": { "temperature": { "value": 48.0, "time": "2024-05-01T10:00:00+02:00" } } } }
///     }
/// }"#;
///
/// let request: PushMetricsRequest = serde_json::from_str(json).unwrap();
/// assert!(request.validate_request().is_ok());
/// assert_eq!(request.observations().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PushMetricsRequest {
    /// Identifier of the reporting host.
    #[serde(alias = "HostName")]
    #[validate(length(min = 1, max = 253, message = "Host name must be 1 to 253 characters"))]
    pub host_name: String,
    /// CPU reports keyed by CPU index.
    #[serde(default, alias = "CPUs")]
    pub cpus: BTreeMap<String, CpuReport>,
}

/// Collector response to an accepted push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMetricsResponse {
    /// Number of readings applied.
    pub accepted: usize,
    /// Message describing the result.
    pub message: String,
}

/// A single accepted reading bound to the gauge series it updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Gauge the reading belongs to.
    pub gauge: CoreGauge,
    /// Series identity.
    pub labels: CoreLabels,
    /// The reading itself.
    pub reading: Reading,
}

/// Errors that can occur during payload validation.
#[derive(Debug, Error)]
pub enum PayloadValidationError {
    /// The host name is empty.
    #[error("Host name cannot be empty")]
    EmptyHostName,

    /// A CPU or core key is empty.
    #[error("Empty {0} index in payload")]
    EmptyIndex(&'static str),

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl PushMetricsRequest {
    /// Creates an empty request for the given host.
    #[must_use]
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            cpus: BTreeMap::new(),
        }
    }

    /// Sets one reading, creating the CPU and core entries as needed.
    #[must_use]
    pub fn with_reading(
        mut self,
        cpu: impl Into<String>,
        core: impl Into<String>,
        gauge: CoreGauge,
        reading: Reading,
    ) -> Self {
        let core = self
            .cpus
            .entry(cpu.into())
            .or_default()
            .cores
            .entry(core.into())
            .or_default();
        match gauge {
            CoreGauge::Temperature => core.temperature = Some(reading),
            CoreGauge::DistanceToTjMax => core.distance_to_tj_max = Some(reading),
        }
        self
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host name is empty or too long
    /// - Any CPU or core index is empty
    pub fn validate_request(&self) -> Result<(), PayloadValidationError> {
        if self.host_name.is_empty() {
            return Err(PayloadValidationError::EmptyHostName);
        }
        for (cpu, report) in &self.cpus {
            if cpu.is_empty() {
                return Err(PayloadValidationError::EmptyIndex("cpu"));
            }
            if report.cores.keys().any(String::is_empty) {
                return Err(PayloadValidationError::EmptyIndex("core"));
            }
        }
        self.validate()?;
        Ok(())
    }

    /// Iterates over every present reading in a stable order.
    ///
    /// CPUs and cores are visited in key order; within a core the temperature
    /// comes before the distance to `TjMax`.
    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.cpus.iter().flat_map(move |(cpu, cpu_report)| {
            cpu_report.cores.iter().flat_map(move |(core, core_report)| {
                CoreGauge::ALL.into_iter().filter_map(move |gauge| {
                    core_report.reading(gauge).map(|reading| Observation {
                        gauge,
                        labels: CoreLabels::new(self.host_name.as_str(), cpu.as_str(), core.as_str()),
                        reading,
                    })
                })
            })
        })
    }
}
