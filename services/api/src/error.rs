//! services/api/src/error.rs
//!
//! Errors that stop the service from starting or serving. Request-level
//! failures are answered by the handlers and never reach this type.

use crate::config::ConfigError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The upload directory could not be created.
    #[error("Cannot prepare upload directory {}: {source}", path.display())]
    UploadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CORS origin '{origin}': {reason}")]
    CorsOrigin { origin: String, reason: String },

    /// Binding or serving failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
