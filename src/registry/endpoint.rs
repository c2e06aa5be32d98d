//! Registry endpoint identity
//!
//! Renders a registry connection identity from request parameters. This is a
//! pure builder: no network I/O happens here, the identity is handed to the
//! registry client per call and never cached.

use std::time::Duration;

use url::Url;

use crate::errors::{Error, Result};

/// Fixed registry-operation timeout applied to every endpoint.
pub const REGISTRY_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection identity for a registry: address, credentials, and timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEndpoint {
    pub address: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl RegistryEndpoint {
    /// Build an endpoint from a raw `host:port` address and optional
    /// credentials. Fails with a configuration error when the address cannot
    /// be rendered into a registry URL.
    pub fn build(addr: &str, username: Option<&str>, password: Option<&str>) -> Result<Self> {
        if addr.trim().is_empty() {
            return Err(Error::config("registry address must not be empty"));
        }

        let rendered = format!("registry://{}", addr.trim());
        let address = Url::parse(&rendered)
            .map_err(|e| Error::config(format!("invalid registry address '{}': {}", addr, e)))?;

        if address.host_str().is_none() {
            return Err(Error::config(format!("registry address '{}' has no host", addr)));
        }

        Ok(Self {
            address,
            username: username.filter(|u| !u.is_empty()).map(str::to_string),
            password: password.filter(|p| !p.is_empty()).map(str::to_string),
            timeout: REGISTRY_OP_TIMEOUT,
        })
    }
}
