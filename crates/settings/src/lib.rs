//! Configuration management for the Athena control plane
//!
//! Settings are layered: built-in defaults, then an optional configuration
//! file, then `ATHENA_`-prefixed environment variables, then the legacy
//! `CORE_GRPC_HOST`, `CORE_GRPC_PORT` and `DATABASE_URL` variables.

pub mod defaults;
pub mod environment;
pub mod manager;
pub mod schema;
pub mod validation;

// Re-export commonly used types
pub use manager::ConfigManager;
pub use schema::{
    ControlPlaneConfig, CoreConfig, DatabaseConfig, LifecycleConfig, LogFormat, LoggingConfig,
    MetricsConfig, ServerConfig, StorageBackend, UnloadPolicy,
};
