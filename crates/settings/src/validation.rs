//! Configuration validation

use std::net::SocketAddr;

use common::error::{Error, Result};

use crate::schema::ControlPlaneConfig;

/// Rejects configurations the control plane cannot run with
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a resolved configuration
    pub fn validate(config: &ControlPlaneConfig) -> Result<()> {
        config
            .server
            .bind_address
            .parse::<SocketAddr>()
            .map_err(|e| {
                Error::Config(format!(
                    "invalid server.bind_address '{}': {}",
                    config.server.bind_address, e
                ))
            })?;

        if config.core.host.trim().is_empty() {
            return Err(Error::Config("core.host must not be empty".to_string()));
        }

        if config.core.port == 0 {
            return Err(Error::Config("core.port must not be 0".to_string()));
        }

        if !(config.core.timeout_secs.is_finite() && config.core.timeout_secs > 0.0) {
            return Err(Error::Config(format!(
                "core.timeout_secs must be positive, got {}",
                config.core.timeout_secs
            )));
        }

        if config.database.url.trim().is_empty() {
            return Err(Error::Config("database.url must not be empty".to_string()));
        }

        if config.database.max_connections == 0 {
            return Err(Error::Config("database.max_connections must not be 0".to_string()));
        }

        if config.lifecycle.list_limit == 0 {
            return Err(Error::Config("lifecycle.list_limit must not be 0".to_string()));
        }

        Ok(())
    }
}
