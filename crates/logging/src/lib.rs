//! Logging for the Athena control plane
//!
//! This crate installs the global `tracing` subscriber according to the
//! logging section of the configuration.

pub mod logger;

// Re-export commonly used types
pub use logger::{init_logging, Logger};
