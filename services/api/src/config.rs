//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where committed course documents are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentStoreKind {
    Postgres,
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub document_store: DocumentStoreKind,
    pub database_url: Option<String>,
    pub log_level: Level,
    pub upload_dir: PathBuf,
    pub asset_base_url: String,
    pub cors_origin: String,
    /// Upper bound on drafts held in memory at once.
    pub max_drafts: usize,
    /// Drafts untouched for this long are dropped.
    pub draft_idle_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            lookup("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Document Store ---
        let document_store = match lookup("DOCUMENT_STORE")
            .unwrap_or_else(|| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => DocumentStoreKind::Postgres,
            "memory" => DocumentStoreKind::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "DOCUMENT_STORE".to_string(),
                    format!("'{}' is not one of postgres, memory", other),
                ))
            }
        };

        let database_url = lookup("DATABASE_URL");
        if document_store == DocumentStoreKind::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        // --- Assets ---
        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./uploads"));
        let asset_base_url = lookup("ASSET_BASE_URL")
            .unwrap_or_else(|| "/assets".to_string())
            .trim_end_matches('/')
            .to_string();

        // --- Drafts ---
        let max_drafts = parse_or(&lookup, "MAX_DRAFTS", 1000usize)?;
        let draft_idle_ttl = Duration::from_secs(parse_or(&lookup, "DRAFT_IDLE_TTL_SECS", 3600u64)?);

        Ok(Self {
            bind_address,
            document_store,
            database_url,
            log_level,
            upload_dir,
            asset_base_url,
            cors_origin,
            max_drafts,
            draft_idle_ttl,
        })
    }
}

/// Parses an optional numeric variable, falling back to `default` when unset.
fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
