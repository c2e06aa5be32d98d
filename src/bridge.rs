//! Subscription lifecycle orchestration
//!
//! `BridgeState` owns all shared bridge state and drives the Subscribe and
//! Unsubscribe flows: registry registration, the detached watch task, the
//! subscription table, and route injection. Handlers hold it behind an `Arc`;
//! no ambient globals.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{Error, Result};
use crate::registry::{
    ConsumerDescriptor, LoggingListener, RegistryClient, RegistryEndpoint,
};
use crate::routing::{RouteInjector, RouterManager};
use crate::subscription::{SubscriptionTable, WatchHandle};

/// Registry connection parameters of a Subscribe/Unsubscribe request.
#[derive(Debug, Clone)]
pub struct RegistrySpec {
    pub addr: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Service parameters of a Subscribe/Unsubscribe request.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub interface: String,
    pub group: String,
    pub methods: Vec<String>,
}

/// Shared bridge state: registry collaborator, subscription table, route
/// injector, and the router manager being written into.
pub struct BridgeState {
    registry: Arc<dyn RegistryClient>,
    subscriptions: SubscriptionTable,
    injector: RouteInjector,
    router: Arc<RouterManager>,
}

impl BridgeState {
    pub fn new(registry: Arc<dyn RegistryClient>, router: Arc<RouterManager>) -> Self {
        Self {
            registry,
            subscriptions: SubscriptionTable::new(),
            injector: RouteInjector::new(router.clone()),
            router,
        }
    }

    pub fn router(&self) -> &Arc<RouterManager> {
        &self.router
    }

    pub fn subscriptions(&self) -> &SubscriptionTable {
        &self.subscriptions
    }

    /// Start tracking a service: register as a consumer, launch the detached
    /// watch, record its handle, and ensure the dispatch rule exists.
    ///
    /// Steps already completed are not rolled back when a later step fails;
    /// a successful register followed by a failed route injection leaves the
    /// consumer registered.
    pub async fn subscribe(&self, registry: &RegistrySpec, service: &ServiceSpec) -> Result<()> {
        let endpoint = build_endpoint(registry)?;
        let descriptor =
            ConsumerDescriptor::new(&service.interface, &service.group, &service.methods);

        self.registry.register(&endpoint, &descriptor).await?;

        // Detached watch: the request does not wait for it and its outcome is
        // never reported back to the HTTP caller.
        let listener = Arc::new(LoggingListener::new(&service.interface));
        let cancel = CancellationToken::new();
        {
            let client = self.registry.clone();
            let descriptor = descriptor.clone();
            let listener = listener.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let service = descriptor.path.clone();
                if let Err(e) = client.watch(descriptor, listener, cancel).await {
                    warn!(service = %service, error = %e, "Registry watch ended with error");
                }
            });
        }

        let handle = Arc::new(WatchHandle::new(descriptor, listener, cancel));
        if let Some(displaced) = self.subscriptions.store(&service.interface, handle) {
            // Swap-and-cancel: a resubscribe must not leak the prior watch.
            displaced.cancel();
            debug!(
                service = %service.interface,
                watch_id = %displaced.id,
                "Cancelled watch displaced by resubscribe"
            );
        }

        self.injector.ensure_route(&service.interface)?;

        info!(service = %service.interface, "Service subscribed");
        Ok(())
    }

    /// Stop tracking a service: unregister the consumer and, if a watch
    /// handle is still tracked, tear the registry subscription down and
    /// cancel the watch task. An unknown service is not an error; the
    /// collaborator's unsubscribe is simply skipped.
    ///
    /// The route rule injected on subscribe is deliberately left in place.
    pub async fn unsubscribe(&self, registry: &RegistrySpec, service: &ServiceSpec) -> Result<()> {
        let endpoint = build_endpoint(registry)?;
        let descriptor =
            ConsumerDescriptor::new(&service.interface, &service.group, &service.methods);

        self.registry.unregister(&endpoint, &descriptor).await?;

        if let Some(handle) = self.subscriptions.load(&service.interface) {
            self.registry
                .unwatch(&descriptor, handle.listener.clone())
                .await
                .map_err(|e| Error::unsubscribe(e.to_string()))?;
            handle.cancel();
            self.subscriptions.remove(&service.interface);
        }

        info!(service = %service.interface, "Service unsubscribed");
        Ok(())
    }
}

fn build_endpoint(registry: &RegistrySpec) -> Result<RegistryEndpoint> {
    RegistryEndpoint::build(
        &registry.addr,
        registry.username.as_deref(),
        registry.password.as_deref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{InMemoryRegistry, ProviderChangeListener};
    use crate::routing::{bootstrap_router, BRIDGE_ROUTER_CONFIG, SERVICE_HEADER};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry_spec() -> RegistrySpec {
        RegistrySpec { addr: "127.0.0.1:2181".into(), username: None, password: None }
    }

    fn user_service() -> ServiceSpec {
        ServiceSpec {
            interface: "com.example.UserService".into(),
            group: String::new(),
            methods: vec!["getUser".into()],
        }
    }

    fn bridge_with(registry: Arc<dyn RegistryClient>) -> BridgeState {
        let router = Arc::new(RouterManager::new());
        bootstrap_router(&router).unwrap();
        BridgeState::new(registry, router)
    }

    #[tokio::test]
    async fn subscribe_registers_tracks_and_routes() {
        let registry = Arc::new(InMemoryRegistry::new());
        let bridge = bridge_with(registry.clone());

        bridge.subscribe(&registry_spec(), &user_service()).await.unwrap();

        assert_eq!(registry.registration_count("com.example.UserService"), 1);
        assert!(bridge.subscriptions().load("com.example.UserService").is_some());
        assert_eq!(
            bridge
                .router()
                .rules_matching_header(
                    BRIDGE_ROUTER_CONFIG,
                    SERVICE_HEADER,
                    "com.example.UserService"
                )
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn resubscribe_cancels_displaced_watch_and_keeps_one_rule() {
        let registry = Arc::new(InMemoryRegistry::new());
        let bridge = bridge_with(registry.clone());

        bridge.subscribe(&registry_spec(), &user_service()).await.unwrap();
        let first = bridge.subscriptions().load("com.example.UserService").unwrap();

        bridge.subscribe(&registry_spec(), &user_service()).await.unwrap();
        let second = bridge.subscriptions().load("com.example.UserService").unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(bridge.router().route_count(BRIDGE_ROUTER_CONFIG), 1);
        assert_eq!(bridge.subscriptions().len(), 1);
    }

    #[tokio::test]
    async fn unsubscribe_removes_tracking_but_not_the_route() {
        let registry = Arc::new(InMemoryRegistry::new());
        let bridge = bridge_with(registry.clone());

        bridge.subscribe(&registry_spec(), &user_service()).await.unwrap();
        bridge.unsubscribe(&registry_spec(), &user_service()).await.unwrap();

        assert_eq!(registry.registration_count("com.example.UserService"), 0);
        assert!(bridge.subscriptions().load("com.example.UserService").is_none());
        // Route rules persist for the process lifetime.
        assert_eq!(bridge.router().route_count(BRIDGE_ROUTER_CONFIG), 1);
    }

    /// Counts unwatch calls so the unknown-listener no-op is observable.
    struct CountingRegistry {
        inner: InMemoryRegistry,
        unwatch_calls: AtomicUsize,
    }

    #[async_trait]
    impl RegistryClient for CountingRegistry {
        async fn register(
            &self,
            endpoint: &RegistryEndpoint,
            descriptor: &ConsumerDescriptor,
        ) -> Result<()> {
            self.inner.register(endpoint, descriptor).await
        }

        async fn unregister(
            &self,
            endpoint: &RegistryEndpoint,
            descriptor: &ConsumerDescriptor,
        ) -> Result<()> {
            self.inner.unregister(endpoint, descriptor).await
        }

        async fn watch(
            &self,
            descriptor: ConsumerDescriptor,
            listener: Arc<dyn ProviderChangeListener>,
            cancel: CancellationToken,
        ) -> Result<()> {
            self.inner.watch(descriptor, listener, cancel).await
        }

        async fn unwatch(
            &self,
            descriptor: &ConsumerDescriptor,
            listener: Arc<dyn ProviderChangeListener>,
        ) -> Result<()> {
            self.unwatch_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.unwatch(descriptor, listener).await
        }
    }

    #[tokio::test]
    async fn unsubscribe_without_tracked_watch_skips_unwatch() {
        let registry = Arc::new(CountingRegistry {
            inner: InMemoryRegistry::new(),
            unwatch_calls: AtomicUsize::new(0),
        });
        let bridge = bridge_with(registry.clone());

        // Never subscribed: unsubscribe still succeeds and the collaborator's
        // unsubscribe operation is never invoked.
        bridge.unsubscribe(&registry_spec(), &user_service()).await.unwrap();
        assert_eq!(registry.unwatch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn subscribe_with_bad_address_fails_before_registering() {
        let registry = Arc::new(InMemoryRegistry::new());
        let bridge = bridge_with(registry.clone());

        let bad = RegistrySpec { addr: "  ".into(), username: None, password: None };
        let err = bridge.subscribe(&bad, &user_service()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(registry.registration_count("com.example.UserService"), 0);
    }
}
