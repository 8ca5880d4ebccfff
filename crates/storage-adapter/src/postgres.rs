//! PostgreSQL model store

use std::convert::TryFrom;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use common::error::{Error, Result};
use common::models::{ModelRecord, ModelRef, ModelStatus};
use settings::DatabaseConfig;

use crate::store::ModelStore;

static MIGRATOR: Migrator = sqlx::migrate!();

const UPSERT_MODEL: &str = r#"
INSERT INTO models (name, version, status)
VALUES ($1, $2, $3)
ON CONFLICT (name, version)
DO UPDATE SET status = EXCLUDED.status, updated_at = now()
RETURNING id, name, version, status, created_at, updated_at
"#;

const SELECT_LATEST_BY_NAME: &str = r#"
SELECT id, name, version, status, created_at, updated_at
FROM models
WHERE name = $1
ORDER BY created_at DESC, id DESC
LIMIT 1
"#;

const SELECT_NEWEST: &str = r#"
SELECT id, name, version, status, created_at, updated_at
FROM models
ORDER BY created_at DESC, id DESC
LIMIT $1
"#;

#[derive(Debug, sqlx::FromRow)]
struct ModelRow {
    id: i64,
    name: String,
    version: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ModelRow> for ModelRecord {
    type Error = Error;

    fn try_from(row: ModelRow) -> Result<Self> {
        let status = row.status.parse::<ModelStatus>().map_err(|_| {
            Error::Persistence(format!(
                "model {} has unrecognised status '{}'",
                row.id, row.status
            ))
        })?;

        Ok(ModelRecord {
            id: row.id,
            name: row.name,
            version: row.version,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn persistence_error(err: sqlx::Error) -> Error {
    Error::Persistence(err.to_string())
}

/// Model store backed by the `models` table
#[derive(Debug, Clone)]
pub struct PostgresModelStore {
    /// Connection pool
    pool: PgPool,
}

impl PostgresModelStore {
    /// Connects a pool using the database configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Connecting to model database (max {} connections)",
            config.max_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(persistence_error)?;

        Ok(Self { pool })
    }

    /// Applies pending schema migrations
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Applying model database migrations");
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| Error::Persistence(format!("migration failed: {}", e)))
    }
}

#[async_trait]
impl ModelStore for PostgresModelStore {
    async fn upsert(&self, model: &ModelRef, status: ModelStatus) -> Result<ModelRecord> {
        let row: ModelRow = sqlx::query_as(UPSERT_MODEL)
            .bind(&model.name)
            .bind(&model.version)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(persistence_error)?;

        debug!("Upserted model {} as {} (id {})", model, status, row.id);
        ModelRecord::try_from(row)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<ModelRecord>> {
        let row: Option<ModelRow> = sqlx::query_as(SELECT_LATEST_BY_NAME)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence_error)?;

        row.map(ModelRecord::try_from).transpose()
    }

    async fn list(&self, limit: usize) -> Result<Vec<ModelRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<ModelRow> = sqlx::query_as(SELECT_NEWEST)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(persistence_error)?;

        rows.into_iter().map(ModelRecord::try_from).collect()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> ModelRow {
        let now = Utc::now();
        ModelRow {
            id: 3,
            name: "fraud-detector".to_string(),
            version: "v0.1".to_string(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_conversion_parses_status() {
        let record = ModelRecord::try_from(row("loaded")).unwrap();
        assert_eq!(record.id, 3);
        assert_eq!(record.status, ModelStatus::Loaded);
    }

    #[test]
    fn test_row_with_unknown_status_is_a_persistence_error() {
        let err = ModelRecord::try_from(row("warming")).unwrap_err();
        assert!(err.is_persistence());
    }

    #[test]
    fn test_migrations_are_embedded() {
        assert!(MIGRATOR.iter().any(|m| m.description.contains("create models")));
    }
}
