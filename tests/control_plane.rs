//! Wiring tests for the assembled control plane

use hyper::{Body, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use athena_control_plane::ControlPlane;
use settings::{ConfigManager, ControlPlaneConfig, StorageBackend};

fn memory_config() -> ConfigManager {
    let mut config = ControlPlaneConfig::default();
    config.database.backend = StorageBackend::Memory;
    config.metrics.prometheus = false;
    // Nothing listens here; the channel connects lazily.
    config.core.port = 1;
    config.core.timeout_secs = 0.5;

    ConfigManager::from_config(config).unwrap()
}

async fn call(control_plane: &ControlPlane, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let router = api_gateway::build_router(control_plane.app_state());
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn memory_backed_control_plane_serves_health() {
    let control_plane = ControlPlane::new(memory_config()).await.unwrap();

    let (status, body) = call(&control_plane, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unreachable_core_fails_load_without_recording_it() {
    let control_plane = ControlPlane::new(memory_config()).await.unwrap();

    let (status, body) = call(
        &control_plane,
        Method::POST,
        "/models/load",
        Some(r#"{"model_name":"fraud-detector","version":"v0.1"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("core error: "));

    let (_, body) = call(&control_plane, Method::GET, "/models/fraud-detector", None).await;
    assert_eq!(body["status"], "not_loaded");
    assert!(body.get("version").is_none());

    let (_, body) = call(&control_plane, Method::GET, "/api/models", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn metrics_route_is_absent_when_prometheus_is_disabled() {
    let control_plane = ControlPlane::new(memory_config()).await.unwrap();

    let (status, _) = call(&control_plane, Method::GET, "/metrics", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
