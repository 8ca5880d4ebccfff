//! Model lifecycle orchestration
//!
//! Load and unload translate into at most one core call followed by at most
//! one store upsert. A model is only ever persisted as `loaded` after the core
//! acknowledged the load.

use std::sync::Arc;

use tracing::{debug, info, warn};

use common::models::{ModelLookup, ModelRecord, ModelRef, ModelStatus};
use common::utils::timed;
use core_client::{CoreAck, CoreClient};
use performance_monitor::MetricsSink;
use settings::{LifecycleConfig, UnloadPolicy};
use storage_adapter::ModelStore;

use crate::error::LifecycleError;

/// Result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Sequences core calls and store writes for model lifecycle requests
pub struct LifecycleOrchestrator {
    /// Model store
    store: Arc<dyn ModelStore>,

    /// Inference core client
    core: Arc<dyn CoreClient>,

    /// Metrics sink for core call timings
    metrics: Arc<dyn MetricsSink>,

    /// Lifecycle settings
    config: LifecycleConfig,
}

impl LifecycleOrchestrator {
    /// Creates a new orchestrator
    pub fn new(
        store: Arc<dyn ModelStore>,
        core: Arc<dyn CoreClient>,
        metrics: Arc<dyn MetricsSink>,
        config: LifecycleConfig,
    ) -> Self {
        info!(
            "Lifecycle orchestrator using {} store, core at {}, unload policy {:?}",
            store.backend_name(),
            core.target(),
            config.unload_policy
        );

        Self {
            store,
            core,
            metrics,
            config,
        }
    }

    /// Loads a model in the core and records it as loaded
    ///
    /// If the core does not acknowledge the load, nothing is written and the
    /// core's message is returned as [`LifecycleError::Core`].
    pub async fn load(&self, model: &ModelRef) -> Result<ModelRecord> {
        info!(model = %model, "Loading model");

        let ack = self.call_core("LoadModel", self.core.load_model(model)).await;
        if !ack.ok {
            warn!(model = %model, "Core failed to load model: {}", ack.message);
            return Err(LifecycleError::Core(ack.message));
        }

        let record = self.store.upsert(model, ModelStatus::Loaded).await?;
        info!(model = %model, id = record.id, "Model loaded");

        Ok(record)
    }

    /// Records a model as not loaded, consulting the core per the unload policy
    pub async fn unload(&self, model: &ModelRef) -> Result<ModelRecord> {
        info!(model = %model, policy = ?self.config.unload_policy, "Unloading model");

        match self.config.unload_policy {
            UnloadPolicy::LocalOnly => {
                debug!(model = %model, "Skipping core unload call");
            }
            UnloadPolicy::NotifyCore => {
                let ack = self.call_core("UnloadModel", self.core.unload_model(model)).await;
                if !ack.ok {
                    warn!(
                        model = %model,
                        "Core failed to unload model, recording it as not loaded anyway: {}",
                        ack.message
                    );
                }
            }
            UnloadPolicy::RequireCore => {
                let ack = self.call_core("UnloadModel", self.core.unload_model(model)).await;
                if !ack.ok {
                    warn!(model = %model, "Core failed to unload model: {}", ack.message);
                    return Err(LifecycleError::Core(ack.message));
                }
            }
        }

        let record = self.store.upsert(model, ModelStatus::NotLoaded).await?;
        info!(model = %model, id = record.id, "Model unloaded");

        Ok(record)
    }

    /// Looks up the most recently created record for `name`
    pub async fn status(&self, name: &str) -> Result<ModelLookup> {
        let lookup = match self.store.get_by_name(name).await? {
            Some(record) => {
                debug!(
                    "Found model {}:{} with status {}",
                    record.name, record.version, record.status
                );
                ModelLookup::Found(record)
            }
            None => {
                debug!("Model {} not found in store", name);
                ModelLookup::Unknown(name.to_string())
            }
        };

        Ok(lookup)
    }

    /// Lists records, newest first; `None` uses the configured limit
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<ModelRecord>> {
        let limit = limit.unwrap_or(self.config.list_limit);
        Ok(self.store.list(limit).await?)
    }

    async fn call_core<F>(&self, method: &'static str, call: F) -> CoreAck
    where
        F: std::future::Future<Output = CoreAck>,
    {
        let (ack, elapsed) = timed(call).await;
        self.metrics.record_core_call(method, elapsed, ack.ok);
        ack
    }
}
