//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DocumentStore` port from the `core` crate. Documents are kept as JSONB
//! rows in PostgreSQL, keyed by collection and id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_authoring_core::ports::{DocumentStore, PortError, PortResult, PutOutcome};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DocumentStore` port.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Creates a new `PgDocumentStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DocumentRecord {
    id: String,
    body: Value,
    updated_at: DateTime<Utc>,
}

//=========================================================================================
// `DocumentStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        owner_key: &str,
        value: Value,
    ) -> PortResult<PutOutcome> {
        // A conflicting row is only updated when it has the same owner; otherwise
        // no row comes back.
        let record = sqlx::query_as::<_, DocumentRecord>(
            "INSERT INTO documents (collection, id, owner_key, body) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body, updated_at = now() \
             WHERE documents.owner_key = EXCLUDED.owner_key \
             RETURNING id, body, updated_at",
        )
        .bind(collection)
        .bind(id)
        .bind(owner_key)
        .bind(&value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match record {
            Some(record) => {
                debug!(collection, id = %record.id, updated_at = %record.updated_at, "document stored");
                Ok(PutOutcome::Stored)
            }
            None => {
                warn!(collection, id, "document id held by another owner");
                Ok(PutOutcome::IdTaken)
            }
        }
    }

    async fn get_document(&self, collection: &str, id: &str) -> PortResult<Option<Value>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            "SELECT id, body, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.map(|r| r.body))
    }
}
