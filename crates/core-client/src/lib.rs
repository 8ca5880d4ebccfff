//! Client for the Athena inference core
//!
//! The core exposes four gRPC operations (load, unload, status, inference).
//! [`CoreClient`] wraps them so that no transport failure ever crosses this
//! boundary as an error: load and unload report `ok = false`, status and
//! inference report a [`CoreError`] value.

pub mod client;
pub mod grpc;
pub mod proto;
pub mod testing;

// Re-export commonly used types
pub use client::{CoreAck, CoreClient, CoreError, RemoteModelStatus};
pub use grpc::GrpcCoreClient;
