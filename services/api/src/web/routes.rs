//! services/api/src/web/routes.rs
//!
//! Builds the API router. Cross-cutting layers (CORS, Swagger UI, static
//! assets) are added by the binary.

use crate::web::rest::{
    create_draft_handler, discard_draft_handler, dismiss_notice_handler,
    dispatch_command_handler, get_course_handler, get_draft_handler, next_step_handler,
    prev_step_handler, submit_handler, upload_banner_handler,
};
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

/// Must stay above `MAX_BANNER_BYTES` so oversized banners reach the size check.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/drafts", post(create_draft_handler))
        .route(
            "/drafts/{draft_id}",
            get(get_draft_handler).delete(discard_draft_handler),
        )
        .route("/drafts/{draft_id}/commands", post(dispatch_command_handler))
        .route("/drafts/{draft_id}/next", post(next_step_handler))
        .route("/drafts/{draft_id}/prev", post(prev_step_handler))
        .route("/drafts/{draft_id}/notice", delete(dismiss_notice_handler))
        .route("/drafts/{draft_id}/banner", post(upload_banner_handler))
        .route("/drafts/{draft_id}/submit", post(submit_handler))
        .route("/courses/{course_id}", get(get_course_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(app_state)
}
