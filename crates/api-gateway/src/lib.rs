//! HTTP API for the Athena control plane
//!
//! This crate exposes the lifecycle orchestrator over a small JSON API:
//! load, unload, status and listing of models, plus health and metrics
//! endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod routes;
pub mod validation;

// Re-export commonly used types
pub use error::ApiError;
pub use rest::RestAPI;
pub use routes::{build_router, AppState};
