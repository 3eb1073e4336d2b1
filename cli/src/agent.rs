//! Push agent: samples local core temperatures and sends them to the collector.

use crate::client::CollectorClient;
use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local};
use shared::models::{CoreGauge, PushMetricsRequest, Reading};
use std::time::Duration;
use sysinfo::{Components, System};

/// CPU index for cores seen before any package sensor.
const DEFAULT_CPU: u32 = 1;

/// One component sensor as read from the operating system.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Sensor label, e.g. `coretemp Core 3`.
    pub label: String,
    /// Current temperature in degrees Celsius.
    pub temperature: f32,
    /// Critical threshold, when the sensor reports one.
    pub critical: Option<f32>,
}

/// Parses a non-empty run of ASCII digits.
fn parse_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Extracts the core index from a sensor label.
///
/// Accepts labels ending in `Core N` or `Core #N`; anything else is not a core.
pub fn core_index(label: &str) -> Option<u32> {
    let (_, tail) = label.trim().rsplit_once("Core ")?;
    parse_index(tail.strip_prefix('#').unwrap_or(tail))
}

/// Extracts the package number from a `Package id N` sensor label.
pub fn package_index(label: &str) -> Option<u32> {
    let (_, tail) = label.trim().rsplit_once("Package id ")?;
    parse_index(tail)
}

/// Builds a push from raw sensor readings.
///
/// Cores belong to the CPU of the closest preceding `Package id N` sensor,
/// numbered from 1. Non-core sensors are skipped, as is a repeated core of
/// the same CPU. Distance to `TjMax` is only reported when the sensor exposes
/// a critical threshold.
pub fn build_request(
    host_name: &str,
    sensors: &[SensorReading],
    time: DateTime<FixedOffset>,
) -> PushMetricsRequest {
    let mut request = PushMetricsRequest::new(host_name);
    let mut cpu = DEFAULT_CPU;

    for sensor in sensors {
        if let Some(package) = package_index(&sensor.label) {
            cpu = package.saturating_add(1);
            continue;
        }
        let Some(core) = core_index(&sensor.label) else {
            continue;
        };

        let cpu_key = cpu.to_string();
        let core_key = core.to_string();
        let seen = request
            .cpus
            .get(&cpu_key)
            .is_some_and(|report| report.cores.contains_key(&core_key));
        if seen {
            tracing::warn!(label = %sensor.label, cpu, core, "Duplicate core sensor ignored");
            continue;
        }

        request = request.with_reading(
            cpu_key.as_str(),
            core_key.as_str(),
            CoreGauge::Temperature,
            Reading::new(f64::from(sensor.temperature), time),
        );
        if let Some(critical) = sensor.critical {
            request = request.with_reading(
                cpu_key.as_str(),
                core_key.as_str(),
                CoreGauge::DistanceToTjMax,
                Reading::new(f64::from(critical - sensor.temperature), time),
            );
        }
    }

    request
}

/// Reads every temperature component the OS exposes.
pub fn read_sensors() -> Vec<SensorReading> {
    let components = Components::new_with_refreshed_list();
    components
        .list()
        .iter()
        .map(|component| SensorReading {
            label: component.label().to_string(),
            temperature: component.temperature(),
            critical: component.critical(),
        })
        .collect()
}

/// Host name the agent reports under.
pub fn host_name(suffix: Option<&str>) -> String {
    let base = System::host_name().unwrap_or_else(|| "unknown".to_string());
    match suffix {
        Some(suffix) => format!("{base}{suffix}"),
        None => base,
    }
}

/// Samples and pushes until Ctrl+C.
///
/// # Errors
///
/// Returns an error only if the agent cannot start; push failures are logged.
pub async fn run(client: CollectorClient, interval: Duration, host_suffix: Option<String>) -> Result<()> {
    let host = host_name(host_suffix.as_deref());
    tracing::info!(%host, interval_secs = interval.as_secs(), url = %client.url("/hardware-data"), "Push agent starting");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping push agent");
                break;
            }
            _ = ticker.tick() => {
                push_once(&client, &host).await;
            }
        }
    }
    Ok(())
}

async fn push_once(client: &CollectorClient, host: &str) {
    let sensors = read_sensors();
    let request = build_request(host, &sensors, Local::now().fixed_offset());
    if request.cpus.is_empty() {
        tracing::warn!(sensors = sensors.len(), "No core temperature sensors found");
        return;
    }

    match client.push(&request).await {
        Ok(response) => tracing::debug!(accepted = response.accepted, "Pushed readings"),
        Err(e) => tracing::error!(error = %e, "Failed to push readings"),
    }
}
