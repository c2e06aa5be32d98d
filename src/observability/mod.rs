//! # Observability
//!
//! Structured logging setup for the registry bridge using the tracing
//! ecosystem. Log level defaults to `info` and is overridden through
//! `RUST_LOG`; set `DUBBO_BRIDGE_LOG_JSON=true` for JSON output.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once: later calls are no-ops, which keeps test
/// binaries that share a process happy.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_output = std::env::var("DUBBO_BRIDGE_LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let result = if json_output {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}

/// Log the effective configuration at startup
pub fn log_config_info(config: &crate::config::Config) {
    tracing::info!(
        api_bind_address = %config.api.bind_address,
        api_port = config.api.port,
        "Registry bridge configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn test_log_config_info() {
        let config = crate::config::Config::default();
        log_config_info(&config);
    }
}
