//! Registry client facade
//!
//! Thin contract over the external registry collaborator. The wire protocol
//! and connection management live behind this trait; the bridge only needs
//! register/unregister plus the watch lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::Result;
use crate::registry::descriptor::ConsumerDescriptor;
use crate::registry::endpoint::RegistryEndpoint;
use crate::registry::listener::ProviderChangeListener;

/// External registry collaborator.
///
/// `register` and `unregister` are synchronous steps of the request path and
/// abort it on failure. `watch` is long-lived: the bridge spawns it detached
/// and it runs until the registry ends the stream or `cancel` fires.
/// `unwatch` tears the collaborator-side subscription down; it is only called
/// when a listener handle is still tracked for the descriptor's service.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn register(
        &self,
        endpoint: &RegistryEndpoint,
        descriptor: &ConsumerDescriptor,
    ) -> Result<()>;

    async fn unregister(
        &self,
        endpoint: &RegistryEndpoint,
        descriptor: &ConsumerDescriptor,
    ) -> Result<()>;

    async fn watch(
        &self,
        descriptor: ConsumerDescriptor,
        listener: Arc<dyn ProviderChangeListener>,
        cancel: CancellationToken,
    ) -> Result<()>;

    async fn unwatch(
        &self,
        descriptor: &ConsumerDescriptor,
        listener: Arc<dyn ProviderChangeListener>,
    ) -> Result<()>;
}
