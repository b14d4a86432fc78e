//! services/api/src/adapters/memory.rs
//!
//! An in-process `DocumentStore`. Used for local runs without PostgreSQL and by
//! the HTTP tests.

use async_trait::async_trait;
use course_authoring_core::ports::{DocumentStore, PortResult, PutOutcome};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryDocumentStore {
    /// `(collection, id)` to `(owner key, body)`.
    documents: RwLock<HashMap<(String, String), (String, Value)>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        owner_key: &str,
        value: Value,
    ) -> PortResult<PutOutcome> {
        let mut documents = self.documents.write().await;
        let key = (collection.to_string(), id.to_string());
        if matches!(documents.get(&key), Some((owner, _)) if owner != owner_key) {
            return Ok(PutOutcome::IdTaken);
        }
        documents.insert(key, (owner_key.to_string(), value));
        Ok(PutOutcome::Stored)
    }

    async fn get_document(&self, collection: &str, id: &str) -> PortResult<Option<Value>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&(collection.to_string(), id.to_string()))
            .map(|(_, value)| value.clone()))
    }
}
