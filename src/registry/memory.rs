//! In-memory registry
//!
//! Process-local implementation of [`RegistryClient`] so the bridge runs
//! standalone and the subscribe/unsubscribe flow is testable end to end.
//! Registrations are matched by the descriptor's timestamp-independent
//! identity; provider change events fan out to watchers over a broadcast
//! channel per service.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::Result;
use crate::registry::client::RegistryClient;
use crate::registry::descriptor::ConsumerDescriptor;
use crate::registry::endpoint::RegistryEndpoint;
use crate::registry::listener::{ProviderChange, ProviderChangeListener};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// In-memory registry collaborator.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    registrations: DashMap<String, Vec<ConsumerDescriptor>>,
    channels: DashMap<String, broadcast::Sender<ProviderChange>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, service: &str) -> broadcast::Sender<ProviderChange> {
        self.channels
            .entry(service.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Announce a provider change to every watcher of the event's service.
    /// Used by tests and demos standing in for real provider churn.
    pub fn announce(&self, event: ProviderChange) {
        let sender = self.channel(&event.provider().service);
        // No receivers is fine: nobody is watching yet.
        let _ = sender.send(event);
    }

    /// Number of live consumer registrations for a service.
    pub fn registration_count(&self, service: &str) -> usize {
        self.registrations.get(service).map(|e| e.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RegistryClient for InMemoryRegistry {
    async fn register(
        &self,
        endpoint: &RegistryEndpoint,
        descriptor: &ConsumerDescriptor,
    ) -> Result<()> {
        debug!(
            registry = %endpoint.address,
            service = %descriptor.path,
            role = %descriptor.role,
            "Registering consumer"
        );

        let mut entry = self.registrations.entry(descriptor.path.clone()).or_default();
        // Re-registering the same identity refreshes it rather than stacking.
        entry.retain(|existing| !existing.matches(descriptor));
        entry.push(descriptor.clone());
        Ok(())
    }

    async fn unregister(
        &self,
        endpoint: &RegistryEndpoint,
        descriptor: &ConsumerDescriptor,
    ) -> Result<()> {
        debug!(
            registry = %endpoint.address,
            service = %descriptor.path,
            "Unregistering consumer"
        );

        // Unregistering an unknown consumer is a no-op: unsubscribe for a
        // service that was never subscribed must complete successfully.
        if let Some(mut entry) = self.registrations.get_mut(&descriptor.path) {
            entry.retain(|existing| !existing.matches(descriptor));
        }
        Ok(())
    }

    async fn watch(
        &self,
        descriptor: ConsumerDescriptor,
        listener: Arc<dyn ProviderChangeListener>,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mut rx = self.channel(&descriptor.path).subscribe();
        debug!(service = %descriptor.path, "Watch started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(service = %descriptor.path, "Watch cancelled");
                    return Ok(());
                }
                event = rx.recv() => match event {
                    Ok(change) => listener.on_provider_change(change).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(service = %descriptor.path, skipped, "Watch lagged behind event stream");
                    }
                    Err(broadcast::error::RecvError::Closed) => return Ok(()),
                },
            }
        }
    }

    async fn unwatch(
        &self,
        descriptor: &ConsumerDescriptor,
        _listener: Arc<dyn ProviderChangeListener>,
    ) -> Result<()> {
        debug!(service = %descriptor.path, "Watch unsubscribed");
        Ok(())
    }
}
