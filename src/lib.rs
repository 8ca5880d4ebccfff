//! Athena control plane
//!
//! Wires configuration, the model store, the inference core client and the
//! metrics sink into a [`LifecycleOrchestrator`] and serves it over HTTP.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use api_gateway::{AppState, RestAPI};
use common::models::{InferenceRequest, InferenceResult, ModelRef};
use core_client::{CoreAck, CoreClient, CoreError, GrpcCoreClient, RemoteModelStatus};
use orchestrator_core::LifecycleOrchestrator;
use performance_monitor::{MetricsSink, NoopMetricsSink, PrometheusMetricsSink};
use settings::{ConfigManager, ControlPlaneConfig};
use storage_adapter::{ModelStore, StorageManager};

/// A fully wired control plane
pub struct ControlPlane {
    /// Configuration manager
    config_manager: Arc<ConfigManager>,

    /// Lifecycle orchestrator shared by all requests
    orchestrator: Arc<LifecycleOrchestrator>,

    /// Metrics sink
    metrics: Arc<dyn MetricsSink>,
}

impl ControlPlane {
    /// Builds the control plane from configuration
    ///
    /// Connects the configured store (running migrations if enabled), creates
    /// a lazily connecting core client and installs the metrics sink.
    pub async fn new(config_manager: ConfigManager) -> Result<Self> {
        let config = config_manager.config();

        let store = StorageManager::connect(&config.database)
            .await
            .context("failed to open the model store")?;

        let core: Arc<dyn CoreClient> = Arc::new(
            GrpcCoreClient::new(&config.core).context("failed to create the core client")?,
        );

        let metrics = Self::metrics_sink(config);

        Ok(Self::from_parts(config_manager, store, core, metrics))
    }

    /// Builds the control plane around already constructed components
    pub fn from_parts(
        config_manager: ConfigManager,
        store: Arc<dyn ModelStore>,
        core: Arc<dyn CoreClient>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        let orchestrator = Arc::new(LifecycleOrchestrator::new(
            store,
            core,
            metrics.clone(),
            config_manager.config().lifecycle.clone(),
        ));

        Self {
            config_manager: Arc::new(config_manager),
            orchestrator,
            metrics,
        }
    }

    fn metrics_sink(config: &ControlPlaneConfig) -> Arc<dyn MetricsSink> {
        if !config.metrics.prometheus {
            return Arc::new(NoopMetricsSink);
        }

        match PrometheusMetricsSink::install() {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!("Prometheus metrics disabled: {}", e);
                Arc::new(NoopMetricsSink)
            }
        }
    }

    /// Returns the state handed to HTTP handlers
    pub fn app_state(&self) -> AppState {
        AppState::new(self.orchestrator.clone(), self.metrics.clone())
    }

    /// Serves the HTTP API until `shutdown` resolves
    pub async fn serve<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let server = RestAPI::new(&self.config_manager.config().server, self.app_state())
            .context("failed to configure the HTTP server")?;

        info!("Starting control plane on {}", server.bind_address());
        server.serve(shutdown).await.context("HTTP server failed")?;

        Ok(())
    }
}

/// Outcome of a probe run against the inference core
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Acknowledgement of the load request
    pub load: CoreAck,

    /// Status reported after the load
    pub status: std::result::Result<RemoteModelStatus, CoreError>,

    /// Inference result for the supplied inputs
    pub inference: std::result::Result<InferenceResult, CoreError>,
}

impl ProbeReport {
    /// Returns true if every step succeeded
    pub fn is_healthy(&self) -> bool {
        self.load.ok && self.status.is_ok() && self.inference.is_ok()
    }
}

/// Exercises load, status and inference against a core, in that order
///
/// Every step runs even if an earlier one failed.
pub async fn probe_core(
    core: &dyn CoreClient,
    model: &ModelRef,
    request_id: String,
    inputs: Vec<f32>,
) -> ProbeReport {
    let load = core.load_model(model).await;
    let status = core.get_status(model).await;
    let inference = core
        .run_inference(InferenceRequest {
            request_id,
            inputs,
            model_name: model.name.clone(),
            model_version: model.version.clone(),
        })
        .await;

    ProbeReport {
        load,
        status,
        inference,
    }
}
