//! Model lifecycle orchestration for the Athena control plane
//!
//! The orchestrator sequences "call the core, then update the store" for
//! load and unload, and answers status and list queries from the store.

pub mod error;
pub mod lifecycle;

// Re-export commonly used types
pub use error::LifecycleError;
pub use lifecycle::LifecycleOrchestrator;
