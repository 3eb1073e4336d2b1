//! Gauge identities exported by the collector.
//!
//! Every gauge shares the same label shape: `(hostname, cpu, core)`.

use serde::{Deserialize, Serialize};

/// Label names of every per-core gauge, in tuple order.
pub const CORE_LABEL_NAMES: [&str; 3] = ["hostname", "cpu", "core"];

/// The per-core gauges exported by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreGauge {
    /// Core temperature in degrees Celsius.
    Temperature,
    /// Degrees Celsius left until the core reaches its maximum junction temperature.
    DistanceToTjMax,
}

impl CoreGauge {
    /// All gauges, in registration order.
    pub const ALL: [Self; 2] = [Self::Temperature, Self::DistanceToTjMax];

    /// Returns the exported metric name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Temperature => "cpu_core_temperature",
            Self::DistanceToTjMax => "cpu_core_distance_to_tj_max",
        }
    }

    /// Returns the help text shown in the exposition format.
    #[must_use]
    pub fn help(self) -> &'static str {
        match self {
            Self::Temperature => "Tracks the temperature in Celsius of cores in device CPUs.",
            Self::DistanceToTjMax => {
                "Tracks the degrees in Celsius left until a CPU core hits its maximum allowable temperature."
            }
        }
    }

    /// Names of every gauge, suitable for handing to a sweeper.
    #[must_use]
    pub fn tracked_names() -> Vec<String> {
        Self::ALL.iter().map(|g| g.name().to_string()).collect()
    }
}

impl std::fmt::Display for CoreGauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One label combination of a per-core gauge.
///
/// # Example
///
/// ```
/// use shared::models::CoreLabels;
///
/// let labels = CoreLabels::new("workstation", "1", "0");
/// assert_eq!(labels.values(), ["workstation", "1", "0"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoreLabels {
    /// Reporting host identifier.
    pub host: String,
    /// CPU (package) index on the host.
    pub cpu: String,
    /// Core index within the CPU.
    pub core: String,
}

impl CoreLabels {
    /// Creates a new label combination.
    #[must_use]
    pub fn new(host: impl Into<String>, cpu: impl Into<String>, core: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            cpu: cpu.into(),
            core: core.into(),
        }
    }

    /// Returns the label values in [`CORE_LABEL_NAMES`] order.
    #[must_use]
    pub fn values(&self) -> [&str; 3] {
        [&self.host, &self.cpu, &self.core]
    }
}
