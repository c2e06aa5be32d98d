//! Consumer descriptor
//!
//! Deterministic consumer identity for a service. The registry matches
//! unregister/unsubscribe calls against earlier registrations by comparing
//! descriptors, so every field except the timestamp must reproduce exactly
//! when rebuilt from the same inputs.

use serde::{Deserialize, Serialize};

/// Wire-protocol tag the registry compares descriptors by. Must always be
/// present or the registry cannot match a later unregister.
pub const DUBBO_PROTOCOL: &str = "dubbo";

/// Role a registration announces to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    Consumer,
    Provider,
}

impl std::fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceRole::Consumer => write!(f, "consumer"),
            ServiceRole::Provider => write!(f, "provider"),
        }
    }
}

/// Consumer identity for a named service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerDescriptor {
    /// Fully-qualified service interface, e.g. `com.example.UserService`.
    pub path: String,
    pub protocol: String,
    pub role: ServiceRole,
    pub group: String,
    pub methods: Vec<String>,
    /// Unix timestamp of descriptor construction. Differs call-to-call and
    /// is never part of the matching identity.
    pub timestamp: i64,
}

impl ConsumerDescriptor {
    /// Build a consumer descriptor for a service. Everything but the
    /// timestamp is derived purely from the inputs.
    pub fn new(service: &str, group: &str, methods: &[String]) -> Self {
        Self {
            path: service.to_string(),
            protocol: DUBBO_PROTOCOL.to_string(),
            role: ServiceRole::Consumer,
            group: group.to_string(),
            methods: methods.to_vec(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Timestamp-independent matching key. Two descriptors with equal
    /// identities refer to the same registration regardless of when they
    /// were built.
    pub fn identity(&self) -> (&str, &str, ServiceRole, &str, &[String]) {
        (&self.path, &self.protocol, self.role, &self.group, &self.methods)
    }

    /// Whether `other` names the same registration as `self`.
    pub fn matches(&self, other: &ConsumerDescriptor) -> bool {
        self.identity() == other.identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_is_deterministic_except_timestamp() {
        let methods = vec!["getUser".to_string(), "listUsers".to_string()];
        let a = ConsumerDescriptor::new("com.example.UserService", "g1", &methods);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = ConsumerDescriptor::new("com.example.UserService", "g1", &methods);

        assert_eq!(a.path, b.path);
        assert_eq!(a.protocol, b.protocol);
        assert_eq!(a.role, b.role);
        assert_eq!(a.group, b.group);
        assert_eq!(a.methods, b.methods);
        assert!(a.matches(&b));
    }

    #[test]
    fn identity_ignores_timestamp() {
        let methods = vec!["getUser".to_string()];
        let mut a = ConsumerDescriptor::new("com.example.UserService", "", &methods);
        let b = ConsumerDescriptor::new("com.example.UserService", "", &methods);
        a.timestamp = 0;
        assert!(a.matches(&b));
    }

    #[test]
    fn different_group_is_a_different_identity() {
        let methods = vec!["getUser".to_string()];
        let a = ConsumerDescriptor::new("com.example.UserService", "blue", &methods);
        let b = ConsumerDescriptor::new("com.example.UserService", "green", &methods);
        assert!(!a.matches(&b));
    }

    #[test]
    fn role_renders_lowercase() {
        assert_eq!(ServiceRole::Consumer.to_string(), "consumer");
        assert_eq!(ServiceRole::Provider.to_string(), "provider");
    }
}
