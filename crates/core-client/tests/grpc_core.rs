//! Round trips against an in-process inference service

use std::time::Duration;

use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use common::models::{InferenceRequest, ModelRef};
use core_client::proto::{self, InferenceService, InferenceServiceServer};
use core_client::{CoreClient, GrpcCoreClient};

/// Loads anything except models named `broken`; doubles inference inputs
#[derive(Default)]
struct FakeCore;

#[tonic::async_trait]
impl InferenceService for FakeCore {
    async fn load_model(
        &self,
        request: Request<proto::ModelRef>,
    ) -> Result<Response<proto::LoadReply>, Status> {
        let model = request.into_inner();
        let ok = model.model_name != "broken";
        Ok(Response::new(proto::LoadReply {
            ok,
            message: format!("load {}:{}", model.model_name, model.version),
        }))
    }

    async fn unload_model(
        &self,
        request: Request<proto::ModelRef>,
    ) -> Result<Response<proto::LoadReply>, Status> {
        let model = request.into_inner();
        Ok(Response::new(proto::LoadReply {
            ok: true,
            message: format!("unload {}:{}", model.model_name, model.version),
        }))
    }

    async fn get_model_status(
        &self,
        request: Request<proto::ModelRef>,
    ) -> Result<Response<proto::ModelStatusReply>, Status> {
        let model = request.into_inner();
        if model.model_name == "ghost" {
            return Err(Status::not_found("model ghost is not registered"));
        }
        Ok(Response::new(proto::ModelStatusReply {
            model_name: model.model_name,
            version: model.version,
            status: "loaded".to_string(),
        }))
    }

    async fn run_inference(
        &self,
        request: Request<proto::InferenceRequest>,
    ) -> Result<Response<proto::InferenceReply>, Status> {
        let request = request.into_inner();
        Ok(Response::new(proto::InferenceReply {
            request_id: request.request_id,
            outputs: request.inputs.iter().map(|x| x * 2.0).collect(),
            latency_ms: 0.5,
            status: "ok".to_string(),
        }))
    }
}

async fn start_core() -> GrpcCoreClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(InferenceServiceServer::new(FakeCore))
            .serve_with_incoming(TcpListenerStream::new(listener)),
    );

    GrpcCoreClient::connect_lazy(&address.to_string(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_load_and_unload_carry_the_core_reply() {
    let core = start_core().await;

    let ack = core.load_model(&ModelRef::new("fraud-detector", "v0.1").unwrap()).await;
    assert!(ack.ok);
    assert_eq!(ack.message, "load fraud-detector:v0.1");

    let ack = core.load_model(&ModelRef::new("broken", "v1").unwrap()).await;
    assert!(!ack.ok);

    let ack = core.unload_model(&ModelRef::new("fraud-detector", "v0.1").unwrap()).await;
    assert!(ack.ok);
    assert_eq!(ack.message, "unload fraud-detector:v0.1");
}

#[tokio::test]
async fn test_status_error_uses_the_status_message() {
    let core = start_core().await;

    let status = core
        .get_status(&ModelRef::new("ranker", "v2").unwrap())
        .await
        .unwrap();
    assert_eq!(status.model_name, "ranker");
    assert_eq!(status.version, "v2");
    assert_eq!(status.status, "loaded");

    let err = core
        .get_status(&ModelRef::new("ghost", "v1").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.message, "model ghost is not registered");
}

#[tokio::test]
async fn test_inference_round_trip_measures_latency_locally() {
    let core = start_core().await;

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
    assert_eq!(result.outputs, vec![2.0, 4.0, 6.0]);
    assert_eq!(result.status, "ok");
    assert!(result.latency_ms > 0.0);
}
