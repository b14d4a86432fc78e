//! crates/course_authoring_core/src/ports.rs
//!
//! Defines the service contracts (traits) the authoring engine depends on.
//! Storage and asset upload live behind these traits so the core stays free of
//! any specific database or file host.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations. Missing documents are not
/// errors; reads return `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Port Payloads
//=========================================================================================

/// A file handed to the upload collaborator.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl AssetFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Callback receiving upload progress as a percentage in `0..=100`.
pub type ProgressFn<'a> = &'a (dyn Fn(u8) + Send + Sync);

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Result of [`DocumentStore::put_document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The document was created, or replaced a document with the same owner key.
    Stored,
    /// Another owner already holds this id. Nothing was written.
    IdTaken,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes `value` under `id`. An existing document is replaced only when it
    /// was written with the same `owner_key`; otherwise the store is left as it
    /// was and `IdTaken` is returned.
    async fn put_document(
        &self,
        collection: &str,
        id: &str,
        owner_key: &str,
        value: Value,
    ) -> PortResult<PutOutcome>;

    async fn get_document(&self, collection: &str, id: &str) -> PortResult<Option<Value>>;
}

#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Stores the file and returns the public URL it can be fetched from.
    async fn upload_asset(&self, file: &AssetFile, on_progress: ProgressFn<'_>) -> PortResult<String>;
}
