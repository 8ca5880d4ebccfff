//! Route table for the HTTP API

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use orchestrator_core::LifecycleOrchestrator;
use performance_monitor::MetricsSink;

use crate::handlers;
use crate::middleware::record_request_metrics;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Lifecycle orchestrator
    pub orchestrator: Arc<LifecycleOrchestrator>,

    /// Metrics sink for request timings and exposition
    pub metrics: Arc<dyn MetricsSink>,
}

impl AppState {
    /// Creates the handler state
    pub fn new(orchestrator: Arc<LifecycleOrchestrator>, metrics: Arc<dyn MetricsSink>) -> Self {
        Self {
            orchestrator,
            metrics,
        }
    }
}

/// Builds the router with request metrics and tracing layers applied
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/api/models", get(handlers::list_models))
        // These shadow `/models/:model_name`, so GET is answered here too.
        .route(
            "/models/load",
            post(handlers::load_model).get(handlers::get_model_named_load),
        )
        .route(
            "/models/unload",
            post(handlers::unload_model).get(handlers::get_model_named_unload),
        )
        .route("/models/:model_name", get(handlers::get_model))
        .route_layer(from_fn_with_state(state.clone(), record_request_metrics))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
