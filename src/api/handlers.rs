//! Subscribe/Unsubscribe handlers
//!
//! Success and failure both answer HTTP 200; the outcome travels in the
//! `errno`/`errMsg` payload. Failure messages are prefixed with the failing
//! operation name.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::routes::ApiState;
use crate::bridge::{RegistrySpec, ServiceSpec};

pub const ERRNO_SUCCESS: i32 = 0;
pub const ERRNO_FAILURE: i32 = 1;

/// Registry block of a subscribe/unsubscribe request.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryParams {
    pub addr: String,
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

/// Service block of a subscribe/unsubscribe request.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceParams {
    pub interface: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Request body shared by Subscribe and Unsubscribe.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionRequest {
    pub registry: RegistryParams,
    pub service: ServiceParams,
}

/// Response envelope for every bridge operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub errno: i32,
    #[serde(rename = "errMsg")]
    pub err_msg: String,
}

impl BridgeResponse {
    pub fn success<S: Into<String>>(msg: S) -> Self {
        Self { errno: ERRNO_SUCCESS, err_msg: msg.into() }
    }

    pub fn failure<S: Into<String>>(msg: S) -> Self {
        Self { errno: ERRNO_FAILURE, err_msg: msg.into() }
    }

    pub fn is_success(&self) -> bool {
        self.errno == ERRNO_SUCCESS
    }
}

fn to_specs(req: SubscriptionRequest) -> (RegistrySpec, ServiceSpec) {
    let registry = RegistrySpec {
        addr: req.registry.addr,
        username: Some(req.registry.user_name).filter(|u| !u.is_empty()),
        password: Some(req.registry.password).filter(|p| !p.is_empty()),
    };
    let service = ServiceSpec {
        interface: req.service.interface,
        group: req.service.group,
        methods: req.service.methods,
    };
    (registry, service)
}

/// Subscribe a service from the registry.
///
/// Undecodable bodies still answer 200 with a failure envelope so callers
/// never have to branch on the HTTP status.
pub async fn subscribe_handler(
    State(state): State<ApiState>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Json<BridgeResponse> {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!(error = %rejection, "Subscribe request body rejected");
            return Json(BridgeResponse::failure(format!(
                "subscribe fail, err: {}",
                rejection
            )));
        }
    };
    let (registry, service) = to_specs(req);
    match state.bridge.subscribe(&registry, &service).await {
        Ok(()) => Json(BridgeResponse::success("subscribe success")),
        Err(e) => {
            warn!(service = %service.interface, error = %e, "Subscribe failed");
            Json(BridgeResponse::failure(format!("subscribe fail, err: {}", e)))
        }
    }
}

/// Unsubscribe a service from the registry.
pub async fn unsubscribe_handler(
    State(state): State<ApiState>,
    payload: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Json<BridgeResponse> {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            warn!(error = %rejection, "Unsubscribe request body rejected");
            return Json(BridgeResponse::failure(format!(
                "unsubscribe fail, err: {}",
                rejection
            )));
        }
    };
    let (registry, service) = to_specs(req);
    match state.bridge.unsubscribe(&registry, &service).await {
        Ok(()) => Json(BridgeResponse::success("unsubscribe success")),
        Err(e) => {
            warn!(service = %service.interface, error = %e, "Unsubscribe failed");
            Json(BridgeResponse::failure(format!("unsubscribe fail, err: {}", e)))
        }
    }
}

/// Liveness probe.
pub async fn health_handler() -> &'static str {
    "OK"
}
