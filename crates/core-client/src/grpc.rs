//! gRPC implementation of [`CoreClient`]

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Response, Status};
use tracing::{debug, warn};

use common::error::{Error, Result};
use common::models::{InferenceRequest, InferenceResult, ModelRef};
use common::utils::{as_millis_f64, execute_with_timeout, timed};
use settings::CoreConfig;

use crate::client::{CoreAck, CoreClient, CoreError, RemoteModelStatus};
use crate::proto::{self, InferenceServiceClient, SERVICE_NAME};

/// Client for a core reachable at `host:port` over plaintext HTTP/2
///
/// The channel connects lazily, so constructing the client succeeds while
/// the core is still down; the first call reports the connection failure.
#[derive(Debug, Clone)]
pub struct GrpcCoreClient {
    /// Generated service client over a shared channel
    client: InferenceServiceClient<Channel>,

    /// `host:port` of the core
    target: String,

    /// Deadline applied to every call
    timeout: Duration,
}

impl GrpcCoreClient {
    /// Creates a client from the core configuration
    pub fn new(config: &CoreConfig) -> Result<Self> {
        Self::connect_lazy(&config.target(), config.timeout())
    }

    /// Creates a client for `target` with the given per-call timeout
    pub fn connect_lazy(target: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Endpoint::from_shared(format!("http://{}", target))
            .map_err(|e| Error::Config(format!("invalid core target '{}': {}", target, e)))?
            .timeout(timeout)
            .connect_timeout(timeout);

        debug!("Created lazy channel to {} at {}", SERVICE_NAME, target);

        Ok(Self {
            client: InferenceServiceClient::new(endpoint.connect_lazy()),
            target: target.to_string(),
            timeout,
        })
    }

    /// Returns the per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.set_timeout(self.timeout);
        request
    }

    /// Runs one unary call, converting every failure into its message
    async fn call<T, F, Fut>(&self, method: &'static str, call: F) -> std::result::Result<T, String>
    where
        F: FnOnce(InferenceServiceClient<Channel>) -> Fut,
        Fut: Future<Output = std::result::Result<Response<T>, Status>>,
    {
        let client = self.client.clone();
        let outcome = execute_with_timeout(
            async move { call(client).await.map_err(|status| Error::Transport(status_text(&status))) },
            self.timeout,
            method,
        )
        .await;

        match outcome {
            Ok(response) => Ok(response.into_inner()),
            Err(err) => {
                let message = match err {
                    Error::Transport(message) => message,
                    other => other.to_string(),
                };
                warn!("Core call {} to {} failed: {}", method, self.target, message);
                Err(message)
            }
        }
    }
}

/// Prefers the status message, the equivalent of gRPC "details"
fn status_text(status: &Status) -> String {
    if status.message().is_empty() {
        status.to_string()
    } else {
        status.message().to_string()
    }
}

fn model_ref(model: &ModelRef) -> proto::ModelRef {
    proto::ModelRef {
        model_name: model.name.clone(),
        version: model.version.clone(),
    }
}

#[async_trait]
impl CoreClient for GrpcCoreClient {
    async fn load_model(&self, model: &ModelRef) -> CoreAck {
        let request = self.request(model_ref(model));
        match self
            .call("LoadModel", |mut client| async move { client.load_model(request).await })
            .await
        {
            Ok(reply) => CoreAck {
                ok: reply.ok,
                message: reply.message,
            },
            Err(message) => CoreAck::failure(message),
        }
    }

    async fn unload_model(&self, model: &ModelRef) -> CoreAck {
        let request = self.request(model_ref(model));
        match self
            .call("UnloadModel", |mut client| async move { client.unload_model(request).await })
            .await
        {
            Ok(reply) => CoreAck {
                ok: reply.ok,
                message: reply.message,
            },
            Err(message) => CoreAck::failure(message),
        }
    }

    async fn get_status(&self, model: &ModelRef) -> std::result::Result<RemoteModelStatus, CoreError> {
        let request = self.request(model_ref(model));
        let reply = self
            .call("GetModelStatus", |mut client| async move {
                client.get_model_status(request).await
            })
            .await
            .map_err(CoreError::new)?;

        Ok(RemoteModelStatus {
            model_name: reply.model_name,
            version: reply.version,
            status: reply.status,
        })
    }

    async fn run_inference(
        &self,
        request: InferenceRequest,
    ) -> std::result::Result<InferenceResult, CoreError> {
        let request = self.request(proto::InferenceRequest {
            request_id: request.request_id,
            inputs: request.inputs,
            model_name: request.model_name,
            model_version: request.model_version,
        });

        let (outcome, elapsed) = timed(self.call("RunInference", |mut client| async move {
            client.run_inference(request).await
        }))
        .await;
        let reply = outcome.map_err(CoreError::new)?;

        Ok(InferenceResult {
            request_id: reply.request_id,
            outputs: reply.outputs,
            latency_ms: as_millis_f64(elapsed),
            status: reply.status,
        })
    }

    fn target(&self) -> String {
        self.target.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_target_is_a_config_error() {
        let err = GrpcCoreClient::connect_lazy("bad host:50051", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_status_text_prefers_message() {
        assert_eq!(status_text(&Status::unavailable("core down")), "core down");
        assert!(status_text(&Status::unavailable("")).contains("Unavailable"));
    }
}
