//! # HTTP API
//!
//! The bridge's REST surface: Subscribe and Unsubscribe plus a health probe.

pub mod handlers;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
pub use server::start_api_server;
