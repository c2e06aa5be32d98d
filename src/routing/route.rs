//! Router configuration model
//!
//! Named router configurations containing virtual hosts and route rules, and
//! the manager that stores them. The manager is internally synchronized;
//! callers share it behind an `Arc` without extra locking.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// A named router configuration: a set of virtual hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub name: String,
    pub virtual_hosts: Vec<VirtualHostConfig>,
}

/// A virtual host: rules matched against request domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualHostConfig {
    pub name: String,
    pub domains: Vec<String>,
    #[serde(default)]
    pub routes: Vec<RouteRule>,
}

impl VirtualHostConfig {
    fn matches_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain || d == "*")
    }
}

/// A single route rule: match criteria mapped to an action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRule {
    pub r#match: RouteMatchConfig,
    pub action: RouteActionConfig,
}

/// Route matching criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMatchConfig {
    #[serde(default)]
    pub headers: Vec<HeaderMatchConfig>,
}

/// Header equality match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderMatchConfig {
    pub name: String,
    pub value: String,
}

/// What to do with a matched request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RouteActionConfig {
    Cluster { name: String },
}

/// Router manager holding the named router configurations.
#[derive(Debug, Default)]
pub struct RouterManager {
    configs: RwLock<HashMap<String, RouterConfig>>,
}

impl RouterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a router configuration wholesale.
    pub fn add_or_update_routers(&self, config: RouterConfig) -> Result<()> {
        if config.name.is_empty() {
            return Err(Error::route_injection("router configuration needs a name"));
        }
        let mut configs = self.configs.write().expect("router table lock poisoned");
        configs.insert(config.name.clone(), config);
        Ok(())
    }

    /// Append a rule to the virtual host of `config_name` matching `domain`.
    pub fn add_route(&self, config_name: &str, domain: &str, rule: RouteRule) -> Result<()> {
        let mut configs = self.configs.write().expect("router table lock poisoned");
        let config = configs.get_mut(config_name).ok_or_else(|| {
            Error::route_injection(format!("unknown router configuration '{}'", config_name))
        })?;

        let vhost = config
            .virtual_hosts
            .iter_mut()
            .find(|vh| vh.matches_domain(domain))
            .ok_or_else(|| {
                Error::route_injection(format!(
                    "no virtual host in '{}' matches domain '{}'",
                    config_name, domain
                ))
            })?;

        vhost.routes.push(rule);
        Ok(())
    }

    /// Snapshot of a router configuration.
    pub fn get(&self, config_name: &str) -> Option<RouterConfig> {
        let configs = self.configs.read().expect("router table lock poisoned");
        configs.get(config_name).cloned()
    }

    /// Total rule count across all virtual hosts of a configuration.
    pub fn route_count(&self, config_name: &str) -> usize {
        let configs = self.configs.read().expect("router table lock poisoned");
        configs
            .get(config_name)
            .map(|c| c.virtual_hosts.iter().map(|vh| vh.routes.len()).sum())
            .unwrap_or(0)
    }

    /// Rules of `config_name` whose header matches include `name == value`.
    pub fn rules_matching_header(
        &self,
        config_name: &str,
        name: &str,
        value: &str,
    ) -> Vec<RouteRule> {
        let configs = self.configs.read().expect("router table lock poisoned");
        let Some(config) = configs.get(config_name) else {
            return Vec::new();
        };
        config
            .virtual_hosts
            .iter()
            .flat_map(|vh| vh.routes.iter())
            .filter(|rule| {
                rule.r#match.headers.iter().any(|h| h.name == name && h.value == value)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wildcard_config(name: &str) -> RouterConfig {
        RouterConfig {
            name: name.to_string(),
            virtual_hosts: vec![VirtualHostConfig {
                name: name.to_string(),
                domains: vec!["*".to_string()],
                routes: Vec::new(),
            }],
        }
    }

    fn service_rule(service: &str) -> RouteRule {
        RouteRule {
            r#match: RouteMatchConfig {
                headers: vec![HeaderMatchConfig {
                    name: "service".to_string(),
                    value: service.to_string(),
                }],
            },
            action: RouteActionConfig::Cluster { name: service.to_string() },
        }
    }

    #[test]
    fn add_route_appends_to_wildcard_vhost() {
        let manager = RouterManager::new();
        manager.add_or_update_routers(wildcard_config("dubbo")).unwrap();

        manager.add_route("dubbo", "*", service_rule("com.example.UserService")).unwrap();

        assert_eq!(manager.route_count("dubbo"), 1);
        let rules =
            manager.rules_matching_header("dubbo", "service", "com.example.UserService");
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rules[0].action,
            RouteActionConfig::Cluster { name: "com.example.UserService".to_string() }
        );
    }

    #[test]
    fn add_route_to_unknown_config_fails() {
        let manager = RouterManager::new();
        let err = manager.add_route("missing", "*", service_rule("svc")).unwrap_err();
        assert!(matches!(err, Error::RouteInjection(_)));
    }

    #[test]
    fn add_route_without_matching_domain_fails() {
        let manager = RouterManager::new();
        manager
            .add_or_update_routers(RouterConfig {
                name: "narrow".to_string(),
                virtual_hosts: vec![VirtualHostConfig {
                    name: "narrow".to_string(),
                    domains: vec!["api.example.com".to_string()],
                    routes: Vec::new(),
                }],
            })
            .unwrap();

        let err = manager.add_route("narrow", "*", service_rule("svc")).unwrap_err();
        assert!(matches!(err, Error::RouteInjection(_)));
    }

    #[test]
    fn unnamed_config_is_rejected() {
        let manager = RouterManager::new();
        let err = manager.add_or_update_routers(wildcard_config("")).unwrap_err();
        assert!(matches!(err, Error::RouteInjection(_)));
    }

    #[test]
    fn upsert_replaces_existing_config() {
        let manager = RouterManager::new();
        manager.add_or_update_routers(wildcard_config("dubbo")).unwrap();
        manager.add_route("dubbo", "*", service_rule("svc")).unwrap();

        manager.add_or_update_routers(wildcard_config("dubbo")).unwrap();
        assert_eq!(manager.route_count("dubbo"), 0);
    }
}
