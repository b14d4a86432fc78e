//! services/api/src/adapters/assets.rs
//!
//! This module contains the asset adapter, which implements the `AssetUploader`
//! port by writing uploads to a local directory that the server exposes under a
//! public base URL.

use async_trait::async_trait;
use course_authoring_core::ports::{AssetFile, AssetUploader, PortError, PortResult, ProgressFn};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

const CHUNK_SIZE: usize = 64 * 1024;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `AssetUploader` port on the local filesystem.
#[derive(Clone)]
pub struct LocalAssetUploader {
    root: PathBuf,
    base_url: String,
}

impl LocalAssetUploader {
    /// Creates a new `LocalAssetUploader`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Builds a collision-free file name, keeping a short alphanumeric extension.
    fn stored_name(file: &AssetFile) -> String {
        let extension = file
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .or_else(|| file.content_type.split('/').nth(1))
            .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase());
        match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }
}

//=========================================================================================
// `AssetUploader` Trait Implementation
//=========================================================================================

#[async_trait]
impl AssetUploader for LocalAssetUploader {
    async fn upload_asset(&self, file: &AssetFile, on_progress: ProgressFn<'_>) -> PortResult<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let name = Self::stored_name(file);
        let path = self.root.join(&name);
        let mut out = tokio::fs::File::create(&path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let total = file.len().max(1);
        let mut written = 0usize;
        on_progress(0);
        for chunk in file.bytes.chunks(CHUNK_SIZE) {
            out.write_all(chunk)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
            written += chunk.len();
            on_progress((written * 100 / total) as u8);
        }
        out.flush()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        on_progress(100);

        info!("Stored asset {} ({} bytes)", name, file.len());
        Ok(format!("{}/{}", self.base_url, name))
    }
}
