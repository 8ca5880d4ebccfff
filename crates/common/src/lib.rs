//! Common utilities and types for the Athena control plane
//! 
//! This crate provides shared functionality used across the control plane,
//! including the error type, the model data model and timing helpers.

pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::*;
