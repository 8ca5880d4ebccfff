//! The core client interface

use async_trait::async_trait;
use thiserror::Error;

use common::models::{InferenceRequest, InferenceResult, ModelRef};

/// Acknowledgement of a load or unload request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreAck {
    /// Whether the core performed the operation
    pub ok: bool,
    /// Message from the core, or the transport error text
    pub message: String,
}

impl CoreAck {
    /// A successful acknowledgement
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    /// A failed acknowledgement
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Model status as reported by the core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteModelStatus {
    /// Model name
    pub model_name: String,
    /// Model version
    pub version: String,
    /// Status string, not interpreted by the control plane
    pub status: String,
}

/// A failed status or inference call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CoreError {
    /// Transport or remote error text
    pub message: String,
}

impl CoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The four operations of the inference core
///
/// Implementations bound every call by their configured timeout and never
/// surface transport failures as panics or errors of another type.
#[async_trait]
pub trait CoreClient: Send + Sync {
    /// Asks the core to load `model`
    async fn load_model(&self, model: &ModelRef) -> CoreAck;

    /// Asks the core to unload `model`
    async fn unload_model(&self, model: &ModelRef) -> CoreAck;

    /// Queries the core's view of `model`
    async fn get_status(&self, model: &ModelRef) -> Result<RemoteModelStatus, CoreError>;

    /// Runs one inference; `latency_ms` covers the remote call only
    async fn run_inference(&self, request: InferenceRequest) -> Result<InferenceResult, CoreError>;

    /// Address of the core, for logs
    fn target(&self) -> String;
}
