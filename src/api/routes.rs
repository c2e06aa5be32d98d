use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::bridge::BridgeState;

use super::handlers::{health_handler, subscribe_handler, unsubscribe_handler};

#[derive(Clone)]
pub struct ApiState {
    pub bridge: Arc<BridgeState>,
}

pub fn build_router(bridge: Arc<BridgeState>) -> Router {
    let state = ApiState { bridge };

    Router::new()
        .route("/api/v1/subscribe", post(subscribe_handler))
        .route("/api/v1/unsubscribe", post(unsubscribe_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
