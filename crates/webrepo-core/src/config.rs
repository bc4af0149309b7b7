//! Remote endpoint configuration.
//!
//! The configuration struct is deserialized from TOML files via the
//! `config` crate, or constructed in code with [`EndpointConfig::new`].

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::result::ClientResult;

/// Configuration for one logical remote collection endpoint.
///
/// This is the deserialization target for a `[repository]`-style TOML
/// section and the input for building the shared HTTP client handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the remote collection (e.g. `"https://api.example.com/employees/"`).
    pub base_url: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Connection establishment timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Maximum number of idle pooled connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl EndpointConfig {
    /// Create a configuration for the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            pool_max_idle_per_host: default_pool_max_idle(),
            user_agent: default_user_agent(),
        }
    }

    /// Load the configuration from a TOML file.
    pub fn load(path: &str) -> ClientResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;
        let cfg: Self = settings.try_deserialize()?;
        if cfg.base_url.is_empty() {
            return Err(ClientError::configuration("base_url must not be empty"));
        }
        Ok(cfg)
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_pool_max_idle() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("webrepo/", env!("CARGO_PKG_VERSION")).to_string()
}
