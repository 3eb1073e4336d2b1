//! HTTP client for the Coretemp collector.

use anyhow::{Context, Result};
use shared::models::{PushMetricsRequest, PushMetricsResponse};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper over `reqwest` bound to one collector base URL.
#[derive(Debug, Clone)]
pub struct CollectorClient {
    http: reqwest::Client,
    base_url: String,
}

impl CollectorClient {
    /// Creates a client for the collector at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a collector path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the collector's health document.
    ///
    /// # Errors
    ///
    /// Returns an error if the collector is unreachable or unhealthy.
    pub async fn health(&self) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to reach collector")?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Pushes one payload to the collector.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the collector rejects it.
    pub async fn push(&self, request: &PushMetricsRequest) -> Result<PushMetricsResponse> {
        let response = self
            .http
            .post(self.url("/hardware-data"))
            .json(request)
            .send()
            .await
            .context("Failed to reach collector")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Collector rejected push ({status}): {body}");
        }
        Ok(response.json().await?)
    }
}
