//! Storage selection
//!
//! Builds the model store named by the database configuration.

use std::sync::Arc;

use tracing::{info, warn};

use common::error::Result;
use settings::{DatabaseConfig, StorageBackend};

use crate::memory::InMemoryModelStore;
use crate::postgres::PostgresModelStore;
use crate::store::ModelStore;

/// Creates model stores from configuration
pub struct StorageManager;

impl StorageManager {
    /// Connects the configured backend, applying migrations when enabled
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ModelStore>> {
        match config.backend {
            StorageBackend::Postgres => {
                let store = PostgresModelStore::connect(config).await?;
                if config.run_migrations {
                    store.run_migrations().await?;
                }
                info!("Using PostgreSQL model store");
                Ok(Arc::new(store))
            }
            StorageBackend::Memory => {
                warn!("Using in-memory model store; model status will not survive a restart");
                Ok(Arc::new(InMemoryModelStore::new()))
            }
        }
    }

    /// Applies migrations to the configured PostgreSQL database
    pub async fn migrate(config: &DatabaseConfig) -> Result<()> {
        match config.backend {
            StorageBackend::Postgres => PostgresModelStore::connect(config).await?.run_migrations().await,
            StorageBackend::Memory => {
                info!("In-memory model store needs no migrations");
                Ok(())
            }
        }
    }
}
