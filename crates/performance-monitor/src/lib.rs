//! Metrics sinks for the Athena control plane
//!
//! The orchestrator and the HTTP layer report timings to an injected
//! [`MetricsSink`] instead of process-wide counters. The binary installs the
//! Prometheus sink; tests use the in-memory collector.

pub mod collector;
pub mod prometheus;
pub mod sink;

// Re-export commonly used types
pub use collector::{CallStats, MetricsCollector};
pub use prometheus::PrometheusMetricsSink;
pub use sink::{MetricsSink, NoopMetricsSink};
