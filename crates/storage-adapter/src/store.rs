//! The model store interface

use async_trait::async_trait;

use common::error::Result;
use common::models::{ModelRecord, ModelRef, ModelStatus};

/// Persistence of model records keyed by (name, version)
///
/// Failures to reach the underlying storage are reported as
/// `Error::Persistence`; implementations do not retry.
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// Sets the status of the record for `model`, creating it if absent
    ///
    /// Check and write happen atomically, so concurrent upserts of a new pair
    /// produce exactly one record.
    async fn upsert(&self, model: &ModelRef, status: ModelStatus) -> Result<ModelRecord>;

    /// Returns the most recently created record named `name`, any version
    async fn get_by_name(&self, name: &str) -> Result<Option<ModelRecord>>;

    /// Returns up to `limit` records, most recently created first
    async fn list(&self, limit: usize) -> Result<Vec<ModelRecord>>;

    /// Short name of the backend, for logs
    fn backend_name(&self) -> &'static str;
}
