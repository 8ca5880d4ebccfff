//! HTTP server

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tracing::{error, info};

use common::{Error, Result};
use settings::ServerConfig;

use crate::routes::{build_router, AppState};

/// Serves the control plane API on one socket
pub struct RestAPI {
    /// Address to bind
    bind_address: SocketAddr,

    /// Application router
    router: Router,
}

impl RestAPI {
    /// Creates a server for the given settings and state
    pub fn new(config: &ServerConfig, state: AppState) -> Result<Self> {
        let bind_address = config.bind_address.parse::<SocketAddr>().map_err(|e| {
            Error::Config(format!(
                "Invalid bind address '{}': {}",
                config.bind_address, e
            ))
        })?;

        Ok(Self {
            bind_address,
            router: build_router(state),
        })
    }

    /// Returns the configured bind address
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Serves requests until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = axum::Server::try_bind(&self.bind_address).map_err(|e| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to bind {}: {}", self.bind_address, e),
            ))
        })?;

        info!("Control plane API listening on {}", self.bind_address);

        server
            .serve(self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                error!("HTTP server error: {}", e);
                Error::Internal(format!("HTTP server error: {}", e))
            })?;

        info!("Control plane API stopped");
        Ok(())
    }
}
