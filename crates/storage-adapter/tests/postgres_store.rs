//! Runs against a real database. Set ATHENA_TEST_DATABASE_URL and run with
//! `--ignored`; the test creates the schema and uses a unique model name.

use std::sync::Arc;

use common::models::{ModelRef, ModelStatus};
use settings::{DatabaseConfig, StorageBackend};
use storage_adapter::{ModelStore, PostgresModelStore};

async fn connect() -> PostgresModelStore {
    let url = std::env::var("ATHENA_TEST_DATABASE_URL")
        .expect("ATHENA_TEST_DATABASE_URL must point at a scratch database");
    let config = DatabaseConfig {
        backend: StorageBackend::Postgres,
        url,
        ..DatabaseConfig::default()
    };

    let store = PostgresModelStore::connect(&config).await.unwrap();
    store.run_migrations().await.unwrap();
    store
}

fn unique_name(prefix: &str) -> String {
    format!(
        "{}-{}",
        prefix,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

#[tokio::test]
#[ignore]
async fn test_upsert_is_keyed_by_name_and_version() {
    let store = connect().await;
    let name = unique_name("fraud-detector");
    let model = ModelRef::new(name.clone(), "v0.1").unwrap();

    let created = store.upsert(&model, ModelStatus::Loaded).await.unwrap();
    let updated = store.upsert(&model, ModelStatus::NotLoaded).await.unwrap();

    assert_eq!(created.id, updated.id);
    assert_eq!(updated.status, ModelStatus::NotLoaded);
    assert!(updated.updated_at >= created.updated_at);

    let latest = store.get_by_name(&name).await.unwrap().unwrap();
    assert_eq!(latest.id, created.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_upserts_do_not_duplicate() {
    let store = Arc::new(connect().await);
    let name = unique_name("race");

    let tasks = (0..16).map(|_| {
        let store = store.clone();
        let model = ModelRef::new(name.clone(), "v1").unwrap();
        tokio::spawn(async move { store.upsert(&model, ModelStatus::Loaded).await.unwrap().id })
    });

    let ids: Vec<i64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert!(ids.iter().all(|id| *id == ids[0]));

    let listed = store.list(1000).await.unwrap();
    assert_eq!(listed.iter().filter(|r| r.name == name).count(), 1);
}
