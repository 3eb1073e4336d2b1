//! Coretemp CLI
//!
//! Command-line interface and push agent for the Coretemp temperature collector.
//!
//! # Usage
//!
//! ```bash
//! coretemp --help
//! coretemp health
//! coretemp push --file payload.json
//! coretemp agent --interval-secs 15
//! ```

#![deny(unsafe_code)]

mod agent;
mod client;

use anyhow::Context;
use clap::{Parser, Subcommand};
use client::CollectorClient;
use shared::models::PushMetricsRequest;
use std::path::PathBuf;
use std::time::Duration;

/// Coretemp CLI - CPU temperature collector command-line interface
#[derive(Parser)]
#[command(name = "coretemp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "CORETEMP_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// Push a saved payload file
    Push {
        /// JSON payload to send
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Sample local core temperatures and push them periodically
    Agent {
        /// Seconds between pushes
        #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,
        /// Appended to the local host name
        #[arg(long)]
        host_suffix: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Health) => {
            let client = CollectorClient::new(&cli.api_url)?;
            let health = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        Some(Commands::Push { file }) => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let request: PushMetricsRequest = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid payload in {}", file.display()))?;
            request.validate_request()?;

            let client = CollectorClient::new(&cli.api_url)?;
            let response = client.push(&request).await?;
            println!("{}", response.message);
        }
        Some(Commands::Agent {
            interval_secs,
            host_suffix,
        }) => {
            let client = CollectorClient::new(&cli.api_url)?;
            agent::run(client, Duration::from_secs(interval_secs), host_suffix).await?;
        }
        None => {
            println!("Coretemp CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        // Verify CLI can parse without arguments
        let cli = Cli::try_parse_from(["coretemp"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_health_command() {
        let cli = Cli::try_parse_from(["coretemp", "health"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Health)));
    }

    #[test]
    fn test_cli_agent_defaults() {
        let cli = Cli::try_parse_from(["coretemp", "agent"]).unwrap();
        match cli.command {
            Some(Commands::Agent {
                interval_secs,
                host_suffix,
            }) => {
                assert_eq!(interval_secs, 15);
                assert_eq!(host_suffix, None);
            }
            _ => panic!("expected agent command"),
        }
    }

    #[test]
    fn test_cli_agent_rejects_zero_interval() {
        let cli = Cli::try_parse_from(["coretemp", "agent", "--interval-secs", "0"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_push_requires_file() {
        assert!(Cli::try_parse_from(["coretemp", "push"]).is_err());
        let cli = Cli::try_parse_from(["coretemp", "push", "--file", "payload.json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Push { .. })));
    }
}
