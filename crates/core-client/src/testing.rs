//! Scriptable [`CoreClient`] for tests and local development
//!
//! Replies default to success. Individual operations can be switched to fail,
//! and every call is recorded so tests can assert on what reached the core.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use common::models::{InferenceRequest, InferenceResult, ModelRef};

use crate::client::{CoreAck, CoreClient, CoreError, RemoteModelStatus};

/// A call observed by [`ScriptedCoreClient`]
#[derive(Debug, Clone, PartialEq)]
pub enum CoreCall {
    Load(ModelRef),
    Unload(ModelRef),
    Status(ModelRef),
    Inference(InferenceRequest),
}

#[derive(Debug, Default, Clone)]
struct Script {
    load_failure: Option<String>,
    unload_failure: Option<String>,
    status_failure: Option<String>,
    inference_failure: Option<String>,
    delay: Option<Duration>,
}

/// Core client whose answers are set by the test
#[derive(Debug, Default)]
pub struct ScriptedCoreClient {
    script: Mutex<Script>,
    calls: Mutex<Vec<CoreCall>>,
}

impl ScriptedCoreClient {
    /// Creates a client that accepts every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes load requests fail with `message`
    pub fn fail_loads(&self, message: impl Into<String>) {
        self.script.lock().load_failure = Some(message.into());
    }

    /// Makes unload requests fail with `message`
    pub fn fail_unloads(&self, message: impl Into<String>) {
        self.script.lock().unload_failure = Some(message.into());
    }

    /// Makes status requests fail with `message`
    pub fn fail_status(&self, message: impl Into<String>) {
        self.script.lock().status_failure = Some(message.into());
    }

    /// Makes inference requests fail with `message`
    pub fn fail_inference(&self, message: impl Into<String>) {
        self.script.lock().inference_failure = Some(message.into());
    }

    /// Delays every reply
    pub fn delay_replies(&self, delay: Duration) {
        self.script.lock().delay = Some(delay);
    }

    /// Returns the calls received so far
    pub fn calls(&self) -> Vec<CoreCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: CoreCall) -> Script {
        self.calls.lock().push(call);
        self.script.lock().clone()
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl CoreClient for ScriptedCoreClient {
    async fn load_model(&self, model: &ModelRef) -> CoreAck {
        let script = self.record(CoreCall::Load(model.clone()));
        pause(script.delay).await;
        match script.load_failure {
            Some(message) => CoreAck::failure(message),
            None => CoreAck::success(format!("loaded {}", model)),
        }
    }

    async fn unload_model(&self, model: &ModelRef) -> CoreAck {
        let script = self.record(CoreCall::Unload(model.clone()));
        pause(script.delay).await;
        match script.unload_failure {
            Some(message) => CoreAck::failure(message),
            None => CoreAck::success(format!("unloaded {}", model)),
        }
    }

    async fn get_status(&self, model: &ModelRef) -> Result<RemoteModelStatus, CoreError> {
        let script = self.record(CoreCall::Status(model.clone()));
        pause(script.delay).await;
        match script.status_failure {
            Some(message) => Err(CoreError::new(message)),
            None => Ok(RemoteModelStatus {
                model_name: model.name.clone(),
                version: model.version.clone(),
                status: "not_loaded".to_string(),
            }),
        }
    }

    async fn run_inference(&self, request: InferenceRequest) -> Result<InferenceResult, CoreError> {
        let script = self.record(CoreCall::Inference(request.clone()));
        pause(script.delay).await;
        match script.inference_failure {
            Some(message) => Err(CoreError::new(message)),
            None => Ok(InferenceResult {
                request_id: request.request_id,
                outputs: request.inputs,
                latency_ms: script.delay.map(|d| d.as_secs_f64() * 1000.0).unwrap_or(0.0),
                status: "ok".to_string(),
            }),
        }
    }

    fn target(&self) -> String {
        "scripted".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_failures_and_recording() {
        let core = ScriptedCoreClient::new();
        let model = ModelRef::new("fraud-detector", "v0.1").unwrap();

        assert!(core.load_model(&model).await.ok);

        core.fail_loads("out of memory");
        let ack = core.load_model(&model).await;
        assert!(!ack.ok);
        assert_eq!(ack.message, "out of memory");

        assert_eq!(
            core.calls(),
            vec![CoreCall::Load(model.clone()), CoreCall::Load(model)]
        );
    }

    #[tokio::test]
    async fn test_inference_echoes_inputs() {
        let core = ScriptedCoreClient::new();
        let result = core
            .run_inference(InferenceRequest {
                request_id: "req-123".to_string(),
                inputs: vec![1.0, 2.0, 3.0],
                model_name: "fraud-detector".to_string(),
                model_version: "v0.1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(result.request_id, "req-123");
        assert_eq!(result.outputs, vec![1.0, 2.0, 3.0]);
        assert_eq!(result.status, "ok");
    }

    #[tokio::test]
    async fn test_status_and_inference_failures_are_values() {
        let core = ScriptedCoreClient::new();
        let model = ModelRef::new("fraud-detector", "v0.1").unwrap();

        assert_eq!(core.get_status(&model).await.unwrap().status, "not_loaded");

        core.fail_status("unknown model");
        core.fail_inference("input shape mismatch");

        assert_eq!(
            core.get_status(&model).await.unwrap_err(),
            CoreError::new("unknown model")
        );
        let err = core
            .run_inference(InferenceRequest {
                request_id: "req-9".to_string(),
                inputs: vec![0.5],
                model_name: model.name.clone(),
                model_version: model.version.clone(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "input shape mismatch");
    }

    #[tokio::test]
    async fn test_delayed_replies_report_latency() {
        let core = ScriptedCoreClient::new();
        core.delay_replies(Duration::from_millis(20));

        let started = std::time::Instant::now();
        let result = core
            .run_inference(InferenceRequest {
                request_id: "req-10".to_string(),
                inputs: vec![1.0],
                model_name: String::new(),
                model_version: String::new(),
            })
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(result.latency_ms, 20.0);
    }
}
