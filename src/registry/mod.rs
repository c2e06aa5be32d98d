//! # Registry Integration
//!
//! Everything the bridge needs to talk to a dubbo service registry: the
//! endpoint and consumer-descriptor builders, the provider-change listener
//! contract, the registry client facade, and an in-memory registry used for
//! standalone operation and tests.

pub mod client;
pub mod descriptor;
pub mod endpoint;
pub mod listener;
pub mod memory;

pub use client::RegistryClient;
pub use descriptor::{ConsumerDescriptor, ServiceRole, DUBBO_PROTOCOL};
pub use endpoint::{RegistryEndpoint, REGISTRY_OP_TIMEOUT};
pub use listener::{LoggingListener, ProviderChange, ProviderChangeListener, ProviderInfo};
pub use memory::InMemoryRegistry;
