//! Provider change notifications
//!
//! Contract between the registry watch and whoever wants to observe provider
//! membership changes for a subscribed service.

use async_trait::async_trait;

/// A provider endpoint as announced by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub service: String,
    pub address: String,
}

/// Membership change for a watched service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderChange {
    Added(ProviderInfo),
    Removed(ProviderInfo),
    Updated(ProviderInfo),
}

impl ProviderChange {
    pub fn provider(&self) -> &ProviderInfo {
        match self {
            ProviderChange::Added(p) | ProviderChange::Removed(p) | ProviderChange::Updated(p) => p,
        }
    }
}

/// Notification sink invoked by the registry watch on provider change events.
#[async_trait]
pub trait ProviderChangeListener: Send + Sync {
    async fn on_provider_change(&self, event: ProviderChange);
}

/// Default listener: logs each event with structured fields.
#[derive(Debug, Default)]
pub struct LoggingListener {
    service: String,
}

impl LoggingListener {
    pub fn new<S: Into<String>>(service: S) -> Self {
        Self { service: service.into() }
    }
}

#[async_trait]
impl ProviderChangeListener for LoggingListener {
    async fn on_provider_change(&self, event: ProviderChange) {
        let kind = match &event {
            ProviderChange::Added(_) => "added",
            ProviderChange::Removed(_) => "removed",
            ProviderChange::Updated(_) => "updated",
        };
        tracing::info!(
            service = %self.service,
            change = kind,
            provider = %event.provider().address,
            "Provider change event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_accessor_returns_payload_for_all_variants() {
        let info = ProviderInfo {
            service: "com.example.UserService".into(),
            address: "10.0.0.2:20880".into(),
        };
        assert_eq!(ProviderChange::Added(info.clone()).provider(), &info);
        assert_eq!(ProviderChange::Removed(info.clone()).provider(), &info);
        assert_eq!(ProviderChange::Updated(info.clone()).provider(), &info);
    }

    #[tokio::test]
    async fn logging_listener_accepts_events() {
        let listener = LoggingListener::new("com.example.UserService");
        listener
            .on_provider_change(ProviderChange::Added(ProviderInfo {
                service: "com.example.UserService".into(),
                address: "10.0.0.2:20880".into(),
            }))
            .await;
    }
}
