//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{LocalAssetUploader, MemoryDocumentStore, PgDocumentStore},
    config::{Config, ConfigError, DocumentStoreKind},
    error::ApiError,
    web::{rest::ApiDoc, router, AppState, DraftRegistry},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use course_authoring_core::ports::DocumentStore;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const DRAFT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect the Document Store ---
    let store: Arc<dyn DocumentStore> = match config.document_store {
        DocumentStoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let pg_store = PgDocumentStore::new(db_pool);
            info!("Running database migrations...");
            pg_store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(pg_store)
        }
        DocumentStoreKind::Memory => {
            info!("Using the in-memory document store; committed courses are lost on restart.");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    // --- 3. Initialize the Asset Uploader ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|source| ApiError::UploadDir {
            path: config.upload_dir.clone(),
            source,
        })?;
    let uploader = Arc::new(LocalAssetUploader::new(
        config.upload_dir.clone(),
        config.asset_base_url.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let drafts = Arc::new(DraftRegistry::new());
    drafts
        .clone()
        .spawn_idle_sweeper(config.draft_idle_ttl, DRAFT_SWEEP_INTERVAL);
    let app_state = Arc::new(AppState {
        store,
        uploader,
        config: config.clone(),
        drafts,
    });

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::CorsOrigin {
            origin: config.cors_origin.clone(),
            reason: e.to_string(),
        })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let mut app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Uploaded banners are served by this process when the base URL is local.
    if config.asset_base_url.starts_with('/') {
        app = app.nest_service(&config.asset_base_url, ServeDir::new(&config.upload_dir));
    }

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
