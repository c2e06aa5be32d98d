use std::sync::Arc;

use dubbo_bridge::{
    api::start_api_server,
    bridge::BridgeState,
    observability::{init_tracing, log_config_info},
    registry::InMemoryRegistry,
    routing::{bootstrap_router, RouterManager},
    Config, Result, APP_NAME, VERSION,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; config is read from the environment below.
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    init_tracing();

    info!(app_name = APP_NAME, version = VERSION, "Starting dubbo registry bridge");

    let config = Config::from_env()?;
    log_config_info(&config);

    // Router bootstrap must succeed before any request is served.
    let router = Arc::new(RouterManager::new());
    bootstrap_router(&router)?;

    let registry = Arc::new(InMemoryRegistry::new());
    let bridge = Arc::new(BridgeState::new(registry, router));

    start_api_server(config.api, bridge).await?;

    info!("Bridge shutdown completed");
    Ok(())
}
