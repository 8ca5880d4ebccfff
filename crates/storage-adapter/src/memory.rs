//! In-memory model store

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use common::error::{Error, Result};
use common::models::{ModelRecord, ModelRef, ModelStatus};

use crate::store::ModelStore;

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<ModelRecord>,
    last_id: i64,
}

/// Process-local model store
///
/// Ids are assigned from a counter starting at 1. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryModelStore {
    /// Records and id counter, guarded together so upserts are atomic
    state: RwLock<MemoryState>,

    /// When set, every operation fails as if the database were unreachable
    unavailable: AtomicBool,
}

impl InMemoryModelStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing (or regaining) the connection to storage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    /// Returns true if no record has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::Persistence("in-memory store marked unavailable".to_string()));
        }
        Ok(())
    }
}

fn newest_first(a: &ModelRecord, b: &ModelRecord) -> std::cmp::Ordering {
    (b.created_at, b.id).cmp(&(a.created_at, a.id))
}

#[async_trait]
impl ModelStore for InMemoryModelStore {
    async fn upsert(&self, model: &ModelRef, status: ModelStatus) -> Result<ModelRecord> {
        self.check_available()?;

        let mut state = self.state.write();
        let now = Utc::now();

        if let Some(record) = state
            .records
            .iter_mut()
            .find(|r| r.name == model.name && r.version == model.version)
        {
            record.status = status;
            record.updated_at = now;
            debug!("Updated model {} to {}", model, status);
            return Ok(record.clone());
        }

        state.last_id += 1;
        let record = ModelRecord {
            id: state.last_id,
            name: model.name.clone(),
            version: model.version.clone(),
            status,
            created_at: now,
            updated_at: now,
        };
        state.records.push(record.clone());
        debug!("Created model {} with id {} as {}", model, record.id, status);

        Ok(record)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<ModelRecord>> {
        self.check_available()?;

        let state = self.state.read();
        Ok(state
            .records
            .iter()
            .filter(|r| r.name == name)
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }

    async fn list(&self, limit: usize) -> Result<Vec<ModelRecord>> {
        self.check_available()?;

        let mut records = self.state.read().records.clone();
        records.sort_by(newest_first);
        records.truncate(limit);
        Ok(records)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn model(name: &str, version: &str) -> ModelRef {
        ModelRef::new(name, version).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let store = InMemoryModelStore::new();
        let fraud = model("fraud-detector", "v0.1");

        let created = store.upsert(&fraud, ModelStatus::Loaded).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.status, ModelStatus::Loaded);

        let updated = store.upsert(&fraud, ModelStatus::NotLoaded).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.status, ModelStatus::NotLoaded);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_name_prefers_most_recent_version() {
        let store = InMemoryModelStore::new();
        store.upsert(&model("ranker", "v1"), ModelStatus::Loaded).await.unwrap();
        store.upsert(&model("ranker", "v2"), ModelStatus::NotLoaded).await.unwrap();
        store.upsert(&model("other", "v9"), ModelStatus::Loaded).await.unwrap();

        // Touching v1 again must not make it "newer": creation order decides.
        store.upsert(&model("ranker", "v1"), ModelStatus::Loaded).await.unwrap();

        let found = store.get_by_name("ranker").await.unwrap().unwrap();
        assert_eq!(found.version, "v2");
        assert!(store.get_by_name("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_limited() {
        let store = InMemoryModelStore::new();
        for i in 0..5 {
            store
                .upsert(&model(&format!("m{}", i), "v1"), ModelStatus::Loaded)
                .await
                .unwrap();
        }

        let listed = store.list(3).await.unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["m4", "m3", "m2"]);
        assert!(store.list(0).await.unwrap().is_empty());
        assert_eq!(store.list(100).await.unwrap().len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_of_new_pair_create_one_record() {
        let store = Arc::new(InMemoryModelStore::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .upsert(&model("fraud-detector", "v0.1"), ModelStatus::Loaded)
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }

        assert_eq!(store.len(), 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_with_persistence_error() {
        let store = InMemoryModelStore::new();
        store.set_unavailable(true);

        let err = store.list(10).await.unwrap_err();
        assert!(err.is_persistence());

        store.set_unavailable(false);
        assert!(store.list(10).await.is_ok());
    }
}
