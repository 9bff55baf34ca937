//! # PostgreSQL Document Store
//!
//! One row per document in the `records` table, with the full document in a
//! JSONB `body` column. The schema name is duplicated into its own column so
//! the query layer can index on it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use nrpti_core::RecordId;

use crate::{DocumentStore, StoreError, StoredDocument};

const CREATE_RECORDS: &str = "CREATE TABLE IF NOT EXISTS records (
    id          UUID PRIMARY KEY,
    schema_name TEXT NOT NULL,
    body        JSONB NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL
)";

const CREATE_SCHEMA_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS records_schema_name_idx ON records (schema_name)";

/// Connect a pool to `database_url`.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    tracing::info!(max_connections, "Connected to PostgreSQL");
    Ok(pool)
}

#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `records` table and its index if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_RECORDS).execute(&self.pool).await?;
        sqlx::query(CREATE_SCHEMA_INDEX).execute(&self.pool).await?;
        tracing::info!("records schema ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn save(&self, doc: StoredDocument) -> Result<RecordId, StoreError> {
        let result = sqlx::query(
            "INSERT INTO records (id, schema_name, body, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(*doc.id.as_uuid())
        .bind(&doc.schema_name)
        .bind(&doc.body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate(doc.id));
        }
        Ok(doc.id)
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let result = sqlx::query("DELETE FROM records WHERE id = ANY($1)")
            .bind(&uuids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn get(&self, id: RecordId) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(
            "SELECT id, schema_name, body FROM records WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RecordRow::into_document))
    }
}

/// Internal row type for SQLx mapping.
#[derive(Debug, sqlx::FromRow)]
struct RecordRow {
    id: Uuid,
    schema_name: String,
    body: serde_json::Value,
}

impl RecordRow {
    fn into_document(self) -> StoredDocument {
        StoredDocument {
            id: RecordId(self.id),
            schema_name: self.schema_name,
            body: self.body,
        }
    }
}
