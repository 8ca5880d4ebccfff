//! In-memory metrics collector
//!
//! Keeps per-key counts and latency totals. Used by tests and by embedders
//! that want to inspect traffic without a Prometheus exporter.

use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::sink::MetricsSink;

/// Aggregated statistics for one key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallStats {
    /// Number of calls
    pub count: u64,
    /// Number of failed calls
    pub failures: u64,
    /// Sum of call latencies
    pub total_latency: Duration,
}

/// Metrics sink that aggregates in memory
#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// Core calls by method
    core_calls: DashMap<String, CallStats>,

    /// HTTP requests by "METHOD route"
    http_requests: DashMap<String, CallStats>,

    /// Status codes in arrival order
    status_codes: Mutex<Vec<u16>>,
}

impl MetricsCollector {
    /// Creates an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns statistics for core calls of `method`
    pub fn core_calls(&self, method: &str) -> CallStats {
        self.core_calls
            .get(method)
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Returns statistics for HTTP requests to `route` with `method`
    pub fn http_requests(&self, method: &str, route: &str) -> CallStats {
        self.http_requests
            .get(&format!("{} {}", method, route))
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    /// Returns every recorded HTTP status code in arrival order
    pub fn status_codes(&self) -> Vec<u16> {
        self.status_codes.lock().clone()
    }

    /// Total number of core calls across all methods
    pub fn total_core_calls(&self) -> u64 {
        self.core_calls.iter().map(|entry| entry.count).sum()
    }
}

impl MetricsSink for MetricsCollector {
    fn record_core_call(&self, method: &str, elapsed: Duration, ok: bool) {
        let mut stats = self.core_calls.entry(method.to_string()).or_default();
        stats.count += 1;
        if !ok {
            stats.failures += 1;
        }
        stats.total_latency += elapsed;
    }

    fn record_http_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        {
            let mut stats = self
                .http_requests
                .entry(format!("{} {}", method, route))
                .or_default();
            stats.count += 1;
            if status >= 500 {
                stats.failures += 1;
            }
            stats.total_latency += elapsed;
        }
        self.status_codes.lock().push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_calls_are_aggregated_per_method() {
        let collector = MetricsCollector::new();
        collector.record_core_call("LoadModel", Duration::from_millis(3), true);
        collector.record_core_call("LoadModel", Duration::from_millis(5), false);
        collector.record_core_call("UnloadModel", Duration::from_millis(1), true);

        let load = collector.core_calls("LoadModel");
        assert_eq!(load.count, 2);
        assert_eq!(load.failures, 1);
        assert_eq!(load.total_latency, Duration::from_millis(8));
        assert_eq!(collector.total_core_calls(), 3);
        assert_eq!(collector.core_calls("RunInference"), CallStats::default());
    }

    #[test]
    fn test_http_requests_track_server_errors() {
        let collector = MetricsCollector::new();
        collector.record_http_request("POST", "/models/load", 200, Duration::from_millis(2));
        collector.record_http_request("POST", "/models/load", 500, Duration::from_millis(4));

        let stats = collector.http_requests("POST", "/models/load");
        assert_eq!(stats.count, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(collector.status_codes(), vec![200, 500]);
    }
}
