//! Configuration schema
//!
//! Every section implements `Default` with the values from [`crate::defaults`],
//! so a configuration file only needs to name the settings it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use common::models::DEFAULT_LIST_LIMIT;

use crate::defaults::*;

/// Root configuration of the control plane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPlaneConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Inference core connection settings
    pub core: CoreConfig,

    /// Model store settings
    pub database: DatabaseConfig,

    /// Model lifecycle settings
    pub lifecycle: LifecycleConfig,

    /// Metrics settings
    pub metrics: MetricsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

/// Inference core connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Core host name
    pub host: String,

    /// Core gRPC port
    pub port: u16,

    /// Timeout applied to every core call, in seconds
    pub timeout_secs: f64,
}

impl CoreConfig {
    /// Returns the `host:port` target of the core service
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CORE_HOST.to_string(),
            port: DEFAULT_CORE_PORT,
            timeout_secs: DEFAULT_CORE_TIMEOUT_SECS,
        }
    }
}

/// Which model store implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// PostgreSQL through a connection pool
    Postgres,
    /// Process-local store, lost on restart
    Memory,
}

/// Model store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Store implementation
    pub backend: StorageBackend,

    /// Connection string
    pub url: String,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Apply pending schema migrations on startup
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            run_migrations: true,
        }
    }
}

/// Whether unloading a model consults the inference core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnloadPolicy {
    /// Only the store is updated; the core is not called
    LocalOnly,
    /// The core is called, but its failure does not block the store update
    NotifyCore,
    /// The store is updated only after the core confirms the unload
    RequireCore,
}

impl Default for UnloadPolicy {
    fn default() -> Self {
        UnloadPolicy::LocalOnly
    }
}

/// Model lifecycle settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Remote confirmation requirement for unloads
    pub unload_policy: UnloadPolicy,

    /// Records returned by a listing when the caller gives no limit
    pub list_limit: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            unload_policy: UnloadPolicy::default(),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Metrics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `/metrics`
    pub prometheus: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { prometheus: true }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines
    Text,
    /// One JSON object per line
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Text,
        }
    }
}
