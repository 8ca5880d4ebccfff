//! Persistent model status storage for the Athena control plane
//!
//! This crate owns the `models` table: one record per (name, version) pair
//! with its last-known status. Records are only ever created or updated
//! through [`ModelStore::upsert`].

pub mod manager;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export commonly used types
pub use manager::StorageManager;
pub use memory::InMemoryModelStore;
pub use postgres::PostgresModelStore;
pub use store::ModelStore;
