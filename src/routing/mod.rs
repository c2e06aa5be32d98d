//! # Routing
//!
//! The proxy-side routing model the bridge writes into: named router
//! configurations holding virtual hosts and header-matched route rules, plus
//! the idempotent route injector.

pub mod injector;
pub mod route;

pub use injector::{bootstrap_router, RouteInjector, BRIDGE_ROUTER_CONFIG, SERVICE_HEADER};
pub use route::{
    HeaderMatchConfig, RouteActionConfig, RouteMatchConfig, RouteRule, RouterConfig, RouterManager,
    VirtualHostConfig,
};
