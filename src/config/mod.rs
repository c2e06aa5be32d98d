//! # Configuration Management
//!
//! Environment-variable driven configuration for the registry bridge.

use crate::Result;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiServerConfig,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0".to_string(), port: 8500 }
    }
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Parameterized over the variable source so tests never touch
    // process-global state.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("DUBBO_BRIDGE_API_PORT")
            .unwrap_or_else(|| "8500".to_string())
            .parse()
            .map_err(|e| crate::Error::config(format!("invalid API port: {}", e)))?;

        let bind_address =
            lookup("DUBBO_BRIDGE_API_BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Self { api: ApiServerConfig { bind_address, port } })
    }
}
