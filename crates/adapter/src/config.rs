//! Startup configuration.
//!
//! Everything is read once from flags or their environment fallbacks and never mutated.

use crate::error::{AdapterError, Result};
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Public RestCSV API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://restcsv.com/api";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "RESTCSV_API_KEY";

#[derive(Debug, Parser)]
#[command(
    name = "restcsv-mcp",
    version,
    about = "Serve the RestCSV API as MCP tools over stdio"
)]
pub struct Cli {
    /// RestCSV API key, sent as a bearer token on every request
    #[arg(long, env = "RESTCSV_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the RestCSV API
    #[arg(long, env = "RESTCSV_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds (unset or 0 keeps the transport default)
    #[arg(long, env = "RESTCSV_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Log filter directives (e.g. `info`, `restcsv_mcp=debug`)
    #[arg(long, env = "RESTCSV_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format (logs always go to stderr)
    #[arg(long, env = "RESTCSV_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Validated adapter configuration.
#[derive(Clone)]
pub struct AdapterConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdapterConfig {
    /// Validate CLI/env input.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Config`] if the API key is missing or blank, or the base URL is
    /// empty.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AdapterError::Config(format!("{API_KEY_ENV} environment variable not set."))
            })?
            .to_string();

        let base_url = cli.base_url.trim().to_string();
        if base_url.is_empty() {
            return Err(AdapterError::Config("base URL must not be empty".to_string()));
        }

        Ok(Self {
            api_key,
            base_url,
            timeout: cli
                .timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
        })
    }
}
