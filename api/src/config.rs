//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use shared::config::staleness::{DEFAULT_STALE_AFTER_SECS, DEFAULT_SWEEP_INTERVAL_SECS};
use shared::config::StalenessConfig;
use std::net::SocketAddr;

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `CORETEMP_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `CORETEMP_PORT`: The port to listen on (default: 8080)
/// - `CORETEMP_SWEEP_INTERVAL_SECS`: Seconds between stale series sweeps (default: 60)
/// - `CORETEMP_STALE_AFTER_SECS`: Seconds of silence before a host is retired (default: 300)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Stale series sweep timing.
    pub staleness: StalenessConfig,
}

/// Reads an optional numeric environment variable.
fn env_number<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(name)
        .ok()
        .map(|raw| raw.parse::<T>().with_context(|| format!("Invalid {name}: {raw}")))
        .transpose()
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric variable is set but cannot be parsed
    /// - The staleness settings are invalid
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("CORETEMP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_number::<u16>("CORETEMP_PORT")?.unwrap_or(8080);
        let sweep_interval_secs = env_number::<u64>("CORETEMP_SWEEP_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        let stale_after_secs =
            env_number::<u64>("CORETEMP_STALE_AFTER_SECS")?.unwrap_or(DEFAULT_STALE_AFTER_SECS);

        let staleness = StalenessConfig::from_secs(sweep_interval_secs, stale_after_secs);
        staleness.validate()?;

        Ok(Self {
            host,
            port,
            staleness,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            staleness: StalenessConfig::default(),
        }
    }
}
