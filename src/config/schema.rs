//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! balancer. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::pool::Pool;

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend pool seed and storage strategy.
    pub pool: PoolConfig,

    /// Health probing settings.
    pub health_check: HealthCheckConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Infrastructure alerting settings.
    pub alerts: AlertConfig,

    /// Administrative path configuration.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Which storage strategy backs the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// In-process map; atomic rotation, state lost on restart.
    Memory,
    /// JSON document per pool on disk; survives restarts.
    Document,
}

/// Backend pool configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Name of the default pool.
    pub name: String,

    /// Comma-separated backend base URLs seeding the default pool.
    pub initial_urls: String,

    /// Storage strategy for the pool.
    pub store: StoreKind,

    /// Directory for pool documents (document store only).
    pub document_dir: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            initial_urls: String::new(),
            store: StoreKind::Memory,
            document_dir: "pools".to_string(),
        }
    }
}

impl PoolConfig {
    /// The configured initial URLs, split and trimmed.
    pub fn initial_url_list(&self) -> Vec<String> {
        self.initial_urls
            .split(',')
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect()
    }

    /// Build the static default pool from the configured seed URLs.
    pub fn seed_pool(&self, min_check_interval: Duration) -> Pool {
        Pool::seeded(&self.name, &self.initial_url_list(), min_check_interval)
    }
}

/// Health probing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Path appended to a backend base URL for liveness probes.
    pub route: String,

    /// Probe timeout in seconds.
    pub timeout_secs: u64,

    /// Minimum seconds between probes of the same entry.
    pub min_interval_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            route: "/health".to_string(),
            timeout_secs: 5,
            min_interval_secs: 10,
        }
    }
}

impl HealthCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for a forwarded request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Infrastructure alerting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum seconds between notifications for one event category.
    pub cooldown_secs: u64,

    /// Alert recipient.
    pub recipient: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 60,
            recipient: "ops@example.com".to_string(),
        }
    }
}

impl AlertConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Administrative path configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Path answering 200 immediately, bypassing the pool.
    pub health_path: String,

    /// Path routing to the pool-management handlers.
    pub pool_path: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            health_path: "/balancer/health".to_string(),
            pool_path: "/balancer/pool".to_string(),
        }
    }
}
