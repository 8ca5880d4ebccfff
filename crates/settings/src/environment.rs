//! Environment variable sources
//!
//! Besides the `ATHENA_` prefixed variables, the control plane honours the
//! variable names used by existing deployments of the core and database.

use config::Map;

/// Prefix of structured environment overrides, e.g. `ATHENA_CORE__PORT`
pub const ENV_PREFIX: &str = "ATHENA";

/// Separator between nested keys in structured overrides
pub const ENV_SEPARATOR: &str = "__";

/// Host of the core service
pub const CORE_GRPC_HOST: &str = "CORE_GRPC_HOST";

/// Port of the core service
pub const CORE_GRPC_PORT: &str = "CORE_GRPC_PORT";

/// Database connection string
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Returns the configuration keys overridden by legacy variables present in `env`
pub fn legacy_overrides(env: &Map<String, String>) -> Vec<(&'static str, String)> {
    [
        (CORE_GRPC_HOST, "core.host"),
        (CORE_GRPC_PORT, "core.port"),
        (DATABASE_URL, "database.url"),
    ]
    .into_iter()
    .filter_map(|(var, key)| env.get(var).map(|value| (key, value.clone())))
    .collect()
}

/// Snapshots the process environment
pub fn process_environment() -> Map<String, String> {
    std::env::vars().collect()
}
