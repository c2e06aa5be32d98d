//! Subscription table
//!
//! Concurrent mapping from service identifier to the handle of its active
//! registry watch. `store` is last-write-wins but returns the displaced
//! handle, so callers can cancel the prior watch instead of leaking it
//! (swap-and-cancel). Readers never block.

use std::sync::Arc;

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::registry::descriptor::ConsumerDescriptor;
use crate::registry::listener::ProviderChangeListener;

/// Handle of a live registry watch: the descriptor it was started with, the
/// listener receiving its events, and the token that stops the watch task.
pub struct WatchHandle {
    pub id: Uuid,
    pub descriptor: ConsumerDescriptor,
    pub listener: Arc<dyn ProviderChangeListener>,
    cancel: CancellationToken,
}

impl WatchHandle {
    pub fn new(
        descriptor: ConsumerDescriptor,
        listener: Arc<dyn ProviderChangeListener>,
        cancel: CancellationToken,
    ) -> Self {
        Self { id: Uuid::new_v4(), descriptor, listener, cancel }
    }

    /// Signal the watch task to stop.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("id", &self.id)
            .field("service", &self.descriptor.path)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Concurrent service identifier → watch handle map. At most one entry per
/// identifier at any instant.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    inner: DashMap<String, Arc<WatchHandle>>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally store a handle for the service, returning whatever
    /// handle it displaced.
    pub fn store(&self, service: &str, handle: Arc<WatchHandle>) -> Option<Arc<WatchHandle>> {
        self.inner.insert(service.to_string(), handle)
    }

    pub fn load(&self, service: &str) -> Option<Arc<WatchHandle>> {
        self.inner.get(service).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, service: &str) -> Option<Arc<WatchHandle>> {
        self.inner.remove(service).map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::listener::LoggingListener;

    fn handle(service: &str) -> Arc<WatchHandle> {
        Arc::new(WatchHandle::new(
            ConsumerDescriptor::new(service, "", &[]),
            Arc::new(LoggingListener::new(service)),
            CancellationToken::new(),
        ))
    }

    #[test]
    fn store_returns_displaced_handle() {
        let table = SubscriptionTable::new();
        let first = handle("com.example.UserService");
        let second = handle("com.example.UserService");

        assert!(table.store("com.example.UserService", first.clone()).is_none());
        let displaced = table.store("com.example.UserService", second.clone()).unwrap();
        assert_eq!(displaced.id, first.id);

        let stored = table.load("com.example.UserService").unwrap();
        assert_eq!(stored.id, second.id);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn load_absent_is_none() {
        let table = SubscriptionTable::new();
        assert!(table.load("com.example.Ghost").is_none());
    }

    #[test]
    fn remove_yields_handle_once() {
        let table = SubscriptionTable::new();
        let h = handle("com.example.UserService");
        table.store("com.example.UserService", h.clone());

        let removed = table.remove("com.example.UserService").unwrap();
        assert_eq!(removed.id, h.id);
        assert!(table.remove("com.example.UserService").is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn concurrent_stores_leave_exactly_one_handle() {
        let table = Arc::new(SubscriptionTable::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = table.clone();
                std::thread::spawn(move || {
                    table.store("com.example.UserService", handle("com.example.UserService"))
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(table.len(), 1);
        assert!(table.load("com.example.UserService").is_some());
    }

    #[test]
    fn cancel_flips_handle_state() {
        let h = handle("com.example.UserService");
        assert!(!h.is_cancelled());
        h.cancel();
        assert!(h.is_cancelled());
    }
}
