//! # dubbo-bridge
//!
//! Bridges a dubbo service registry to a proxy's request router. Callers ask
//! the bridge to start or stop tracking a named remote service; the bridge
//! registers itself as a consumer with the registry, keeps a live watch for
//! provider changes, and ensures the router carries a matching dispatch rule
//! so inbound requests tagged with the service identifier reach the right
//! upstream cluster.
//!
//! ## Architecture
//!
//! ```text
//! HTTP API (axum) → BridgeState → Registry client (register/watch)
//!                        ↓
//!               Route injector → Router manager (wildcard virtual host)
//! ```
//!
//! ## Core Components
//!
//! - **Registry integration**: endpoint/descriptor builders and the registry
//!   client facade, with an in-memory registry for standalone use
//! - **Subscription table**: concurrent service → watch-handle map with
//!   swap-and-cancel on resubscribe
//! - **Route injector**: exactly-once route-rule creation per service
//!   identifier for the process lifetime
//!
//! All bridge state is process-memory only; a restarted process must have
//! its consumers re-subscribed by the caller.

pub mod api;
pub mod bridge;
pub mod config;
pub mod errors;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod subscription;

// Re-export commonly used types
pub use bridge::{BridgeState, RegistrySpec, ServiceSpec};
pub use config::Config;
pub use errors::{Error, Result};
pub use observability::init_tracing;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
