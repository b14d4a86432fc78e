//! Banner image upload state. The upload itself runs elsewhere; this tracks
//! whether one is pending, its progress and the last failure.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{EditError, EditResult};
use crate::ports::{AssetFile, AssetUploader, PortError};

/// Largest banner image accepted, in bytes.
pub const MAX_BANNER_BYTES: usize = 5 * 1024 * 1024;

/// Rejects files that may not be uploaded as a banner.
pub fn validate_banner_file(file: &AssetFile) -> EditResult<()> {
    let mime = file.content_type.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(EditError::UnsupportedImageType(file.content_type.clone()));
    }
    if file.len() > MAX_BANNER_BYTES {
        return Err(EditError::ImageTooLarge {
            size: file.len(),
            max: MAX_BANNER_BYTES,
        });
    }
    Ok(())
}

/// Validates and uploads a banner image, returning its URL.
pub async fn upload_banner(
    uploader: &dyn AssetUploader,
    file: &AssetFile,
    on_progress: &(dyn Fn(u8) + Send + Sync),
) -> Result<String, BannerUploadError> {
    validate_banner_file(file)?;
    let url = uploader.upload_asset(file, on_progress).await?;
    Ok(url)
}

#[derive(Debug, thiserror::Error)]
pub enum BannerUploadError {
    #[error(transparent)]
    Invalid(#[from] EditError),
    #[error("Banner upload failed: {0}")]
    Upload(#[from] PortError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BannerUpload {
    pub pending: bool,
    pub progress: u8,
    pub error: Option<String>,
}

impl BannerUpload {
    /// Marks an upload as started after validating the file.
    pub fn begin(&mut self, file: &AssetFile) -> EditResult<()> {
        if self.pending {
            return Err(EditError::UploadInProgress);
        }
        validate_banner_file(file)?;
        debug!(file = %file.file_name, size = file.len(), "banner upload started");
        self.pending = true;
        self.progress = 0;
        self.error = None;
        Ok(())
    }

    pub fn report_progress(&mut self, percent: u8) {
        if self.pending {
            self.progress = percent.min(100);
        }
    }

    /// Records the upload outcome and returns the URL to write into the
    /// course on success. On failure the caller keeps the previous banner.
    pub fn finish(&mut self, result: Result<String, BannerUploadError>) -> Option<String> {
        self.pending = false;
        match result {
            Ok(url) => {
                self.progress = 100;
                self.error = None;
                Some(url)
            }
            Err(e) => {
                warn!("banner upload failed: {}", e);
                self.progress = 0;
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    fn image(size: usize) -> AssetFile {
        AssetFile::new("banner.png", "image/png", Bytes::from(vec![0u8; size]))
    }

    #[test]
    fn rejects_non_images() {
        let file = AssetFile::new("notes.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        assert_eq!(
            validate_banner_file(&file),
            Err(EditError::UnsupportedImageType("application/pdf".to_string()))
        );
    }

    #[test]
    fn rejects_files_over_limit() {
        assert!(validate_banner_file(&image(MAX_BANNER_BYTES)).is_ok());
        assert!(matches!(
            validate_banner_file(&image(MAX_BANNER_BYTES + 1)),
            Err(EditError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn second_upload_is_refused_while_pending() {
        let mut upload = BannerUpload::default();
        upload.begin(&image(10)).unwrap();
        assert_eq!(upload.begin(&image(10)), Err(EditError::UploadInProgress));
    }

    #[test]
    fn failure_resets_progress_and_keeps_message() {
        let mut upload = BannerUpload::default();
        upload.begin(&image(10)).unwrap();
        upload.report_progress(60);
        assert_eq!(upload.progress, 60);
        let url = upload.finish(Err(PortError::Unexpected("connection reset".to_string()).into()));
        assert!(url.is_none());
        assert!(!upload.pending);
        assert_eq!(upload.progress, 0);
        assert!(upload.error.as_deref().unwrap().contains("connection reset"));
    }

    struct RecordingUploader {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl AssetUploader for RecordingUploader {
        async fn upload_asset(&self, file: &AssetFile, on_progress: &(dyn Fn(u8) + Send + Sync)) -> PortResult<String> {
            *self.calls.lock().unwrap() += 1;
            on_progress(100);
            Ok(format!("/assets/{}", file.file_name))
        }
    }

    #[tokio::test]
    async fn invalid_file_never_reaches_uploader() {
        let uploader = RecordingUploader { calls: Mutex::new(0) };
        let file = AssetFile::new("a.txt", "text/plain", Bytes::from_static(b"hi"));
        let result = upload_banner(&uploader, &file, &|_: u8| {}).await;
        assert!(matches!(result, Err(BannerUploadError::Invalid(_))));
        assert_eq!(*uploader.calls.lock().unwrap(), 0);

        let url = upload_banner(&uploader, &image(4), &|_: u8| {}).await.unwrap();
        assert_eq!(url, "/assets/banner.png");
        assert_eq!(*uploader.calls.lock().unwrap(), 1);
    }
}
