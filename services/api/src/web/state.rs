//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the registry of open authoring
//! drafts.

use crate::config::Config;
use course_authoring_core::ports::{AssetUploader, DocumentStore};
use course_authoring_core::wizard::AuthoringSession;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub uploader: Arc<dyn AssetUploader>,
    pub config: Arc<Config>,
    pub drafts: Arc<DraftRegistry>,
}

//=========================================================================================
// DraftRegistry (One AuthoringSession per Draft)
//=========================================================================================

/// A draft is edited by one request at a time: every handler locks the
/// session it touches for the whole operation.
pub type SharedSession = Arc<Mutex<AuthoringSession>>;

struct DraftEntry {
    session: SharedSession,
    last_used: Instant,
}

#[derive(Default)]
pub struct DraftRegistry {
    drafts: RwLock<HashMap<Uuid, DraftEntry>>,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new, empty authoring session. Returns `None` once `max_drafts`
    /// drafts are open.
    pub async fn open(&self, max_drafts: usize) -> Option<(Uuid, SharedSession)> {
        let mut drafts = self.drafts.write().await;
        if drafts.len() >= max_drafts {
            return None;
        }
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(AuthoringSession::new()));
        drafts.insert(
            id,
            DraftEntry {
                session: session.clone(),
                last_used: Instant::now(),
            },
        );
        Some((id, session))
    }

    /// Looks a draft up and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.drafts.write().await.get_mut(&id).map(|entry| {
            entry.last_used = Instant::now();
            entry.session.clone()
        })
    }

    pub async fn close(&self, id: Uuid) -> bool {
        self.drafts.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    /// Drops drafts unused for longer than `idle_ttl` as of `now`. Drafts still
    /// referenced elsewhere (a request in flight, a running banner upload) are
    /// kept. Returns how many were dropped.
    pub async fn sweep_idle(&self, now: Instant, idle_ttl: Duration) -> usize {
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, entry| {
            Arc::strong_count(&entry.session) > 1
                || now.saturating_duration_since(entry.last_used) <= idle_ttl
        });
        before - drafts.len()
    }

    /// Runs [`DraftRegistry::sweep_idle`] every `every` until the runtime shuts down.
    pub fn spawn_idle_sweeper(
        self: Arc<Self>,
        idle_ttl: Duration,
        every: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let dropped = self.sweep_idle(Instant::now(), idle_ttl).await;
                if dropped > 0 {
                    info!("Dropped {} idle authoring drafts", dropped);
                }
            }
        })
    }
}
