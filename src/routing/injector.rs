//! Route injection
//!
//! One-time router bootstrap plus the idempotency guard that guarantees at
//! most one route rule per service identifier for the process lifetime.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info};

use crate::errors::Result;
use crate::routing::route::{
    HeaderMatchConfig, RouteActionConfig, RouteMatchConfig, RouteRule, RouterConfig, RouterManager,
    VirtualHostConfig,
};

/// Name of the router configuration the bridge owns.
pub const BRIDGE_ROUTER_CONFIG: &str = "dubbo";

/// Request header carrying the service identifier the rule matches on.
pub const SERVICE_HEADER: &str = "service";

/// Create the bridge's router configuration: a single virtual host matching
/// all domains. Must run before any request is served; failure is fatal to
/// startup, there is no degraded mode without a routing container.
pub fn bootstrap_router(router: &RouterManager) -> Result<()> {
    router.add_or_update_routers(RouterConfig {
        name: BRIDGE_ROUTER_CONFIG.to_string(),
        virtual_hosts: vec![VirtualHostConfig {
            name: BRIDGE_ROUTER_CONFIG.to_string(),
            domains: vec!["*".to_string()],
            routes: Vec::new(),
        }],
    })?;
    info!(router_config = BRIDGE_ROUTER_CONFIG, "Router configuration bootstrapped");
    Ok(())
}

/// Idempotency guard over route creation. Membership in the flag set is
/// monotonic: once an identifier is present it never leaves, including after
/// a failed injection and on unsubscribe.
#[derive(Debug)]
pub struct RouteInjector {
    injected: DashMap<String, ()>,
    router: Arc<RouterManager>,
}

impl RouteInjector {
    pub fn new(router: Arc<RouterManager>) -> Self {
        Self { injected: DashMap::new(), router }
    }

    /// Ensure a dispatch rule exists for the service: header
    /// `service == <id>` routed to the cluster named `<id>`, under the
    /// wildcard virtual host.
    ///
    /// The flag is set atomically before the router call, so a failed
    /// injection leaves the identifier parked for the process lifetime; a
    /// later call for the same identifier is a no-op, not a retry.
    pub fn ensure_route(&self, service: &str) -> Result<()> {
        // Atomic test-and-set: whoever inserts first owns the router call.
        if self.injected.insert(service.to_string(), ()).is_some() {
            return Ok(());
        }

        let rule = RouteRule {
            r#match: RouteMatchConfig {
                headers: vec![HeaderMatchConfig {
                    name: SERVICE_HEADER.to_string(),
                    value: service.to_string(),
                }],
            },
            action: RouteActionConfig::Cluster { name: service.to_string() },
        };

        self.router.add_route(BRIDGE_ROUTER_CONFIG, "*", rule).inspect_err(|e| {
            error!(
                service,
                error = %e,
                "Route injection failed; identifier stays flagged and will not be retried"
            );
        })?;

        info!(service, cluster = service, "Route rule injected");
        Ok(())
    }

    /// Whether a route injection was already attempted for the service.
    pub fn is_injected(&self, service: &str) -> bool {
        self.injected.contains_key(service)
    }
}
