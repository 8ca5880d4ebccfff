//! Prometheus-backed metrics sink

use std::time::Duration;

use metrics::{histogram, increment_counter};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use common::error::{Error, Result};

use crate::sink::MetricsSink;

/// Total HTTP requests by method, route and status
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// HTTP request latency by route
pub const HTTP_REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Total calls to the core by method and outcome
pub const CORE_GRPC_REQUESTS_TOTAL: &str = "core_grpc_requests_total";

/// Core call latency by method
pub const CORE_GRPC_DURATION: &str = "core_grpc_duration_seconds";

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Sink that feeds the global `metrics` recorder and renders it for scraping
#[derive(Clone)]
pub struct PrometheusMetricsSink {
    /// Handle to the installed recorder
    handle: PrometheusHandle,
}

impl PrometheusMetricsSink {
    /// Installs the Prometheus recorder as the global `metrics` recorder
    ///
    /// Fails if a global recorder is already installed.
    pub fn install() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Suffix("duration_seconds".to_string()), LATENCY_BUCKETS)
            .map_err(|e| Error::Internal(format!("invalid histogram buckets: {}", e)))?
            .install_recorder()
            .map_err(|e| Error::Internal(format!("failed to install Prometheus recorder: {}", e)))?;

        info!("Prometheus metrics recorder installed");

        Ok(Self { handle })
    }
}

impl MetricsSink for PrometheusMetricsSink {
    fn record_core_call(&self, method: &str, elapsed: Duration, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        increment_counter!(
            CORE_GRPC_REQUESTS_TOTAL,
            "method" => method.to_string(),
            "outcome" => outcome
        );
        histogram!(
            CORE_GRPC_DURATION,
            elapsed.as_secs_f64(),
            "method" => method.to_string()
        );
    }

    fn record_http_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        increment_counter!(
            HTTP_REQUESTS_TOTAL,
            "method" => method.to_string(),
            "endpoint" => route.to_string(),
            "status" => status.to_string()
        );
        histogram!(
            HTTP_REQUEST_DURATION,
            elapsed.as_secs_f64(),
            "endpoint" => route.to_string()
        );
    }

    fn render(&self) -> Option<String> {
        Some(self.handle.render())
    }
}
