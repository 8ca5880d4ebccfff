//! The metrics sink interface

use std::time::Duration;

/// Receives timings from the control plane
pub trait MetricsSink: Send + Sync {
    /// Records one call to the inference core
    fn record_core_call(&self, method: &str, elapsed: Duration, ok: bool);

    /// Records one completed HTTP request
    fn record_http_request(&self, method: &str, route: &str, status: u16, elapsed: Duration);

    /// Renders the collected metrics in an exposition format, if supported
    fn render(&self) -> Option<String> {
        None
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record_core_call(&self, _method: &str, _elapsed: Duration, _ok: bool) {}

    fn record_http_request(&self, _method: &str, _route: &str, _status: u16, _elapsed: Duration) {}
}
