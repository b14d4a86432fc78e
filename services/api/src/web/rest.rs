//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{DraftView, SubmitResponse};
use crate::web::state::{AppState, SharedSession};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use course_authoring_core::editors::banner::upload_banner;
use course_authoring_core::error::SubmitError;
use course_authoring_core::ports::AssetFile;
use course_authoring_core::wizard::{AuthoringSession, Command};
use course_authoring_core::COURSES_COLLECTION;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_draft_handler,
        get_draft_handler,
        discard_draft_handler,
        dispatch_command_handler,
        next_step_handler,
        prev_step_handler,
        dismiss_notice_handler,
        upload_banner_handler,
        submit_handler,
        get_course_handler,
    ),
    components(
        schemas(DraftView, SubmitResponse)
    ),
    tags(
        (name = "Course Authoring API", description = "Wizard endpoints for building and committing a course.")
    )
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

//=========================================================================================
// Helpers
//=========================================================================================

async fn find_draft(app_state: &AppState, draft_id: Uuid) -> Result<SharedSession, HandlerError> {
    app_state
        .drafts
        .get(draft_id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Draft {} not found", draft_id)))
}

/// 200 with the view when the action went through, 422 with the view (and its
/// notice) when the editor refused it.
fn view_response<T, E>(
    draft_id: Uuid,
    session: &AuthoringSession,
    outcome: &Result<T, E>,
) -> (StatusCode, Json<DraftView>) {
    let status = if outcome.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(DraftView::of(draft_id, session)))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Open a new authoring draft with an empty course.
#[utoipa::path(
    post,
    path = "/drafts",
    responses(
        (status = 201, description = "Draft opened", body = DraftView),
        (status = 503, description = "Too many open drafts")
    )
)]
pub async fn create_draft_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HandlerError> {
    let (draft_id, session) = app_state
        .drafts
        .open(app_state.config.max_drafts)
        .await
        .ok_or_else(|| {
            warn!("Refused a new draft: {} drafts open", app_state.config.max_drafts);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Too many open drafts; try again later".to_string(),
            )
        })?;
    info!("Opened authoring draft {}", draft_id);
    let session = session.lock().await;
    Ok((StatusCode::CREATED, Json(DraftView::of(draft_id, &session))))
}

/// Read the current state of a draft.
#[utoipa::path(
    get,
    path = "/drafts/{draft_id}",
    responses(
        (status = 200, description = "Current draft state", body = DraftView),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id returned by POST /drafts"))
)]
pub async fn get_draft_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = find_draft(&app_state, draft_id).await?;
    let session = session.lock().await;
    Ok(Json(DraftView::of(draft_id, &session)))
}

/// Throw a draft away without committing it.
#[utoipa::path(
    delete,
    path = "/drafts/{draft_id}",
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn discard_draft_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    if app_state.drafts.close(draft_id).await {
        info!("Discarded authoring draft {}", draft_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("Draft {} not found", draft_id)))
    }
}

/// Apply one editing command to a draft.
///
/// The body is a JSON object tagged by `type`, e.g.
/// `{"type": "add_chapter", "title": "Basics", "duration": "1h"}`.
#[utoipa::path(
    post,
    path = "/drafts/{draft_id}/commands",
    request_body(content_type = "application/json", description = "A command object tagged by `type`."),
    responses(
        (status = 200, description = "Command applied", body = DraftView),
        (status = 422, description = "Command refused; see `notice`", body = DraftView),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn dispatch_command_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
    Json(command): Json<Command>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = find_draft(&app_state, draft_id).await?;
    let mut session = session.lock().await;
    let outcome = session.dispatch(command);
    Ok(view_response(draft_id, &session, &outcome))
}

/// Advance to the next wizard step if the current one is complete.
#[utoipa::path(
    post,
    path = "/drafts/{draft_id}/next",
    responses(
        (status = 200, description = "Moved forward (or already on the last step)", body = DraftView),
        (status = 422, description = "Current step incomplete; see `notice`", body = DraftView),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn next_step_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = find_draft(&app_state, draft_id).await?;
    let mut session = session.lock().await;
    let outcome = session.next();
    Ok(view_response(draft_id, &session, &outcome))
}

/// Go back one wizard step. Nothing is discarded.
#[utoipa::path(
    post,
    path = "/drafts/{draft_id}/prev",
    responses(
        (status = 200, description = "Moved back (or already on the first step)", body = DraftView),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn prev_step_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = find_draft(&app_state, draft_id).await?;
    let mut session = session.lock().await;
    session.prev();
    Ok(Json(DraftView::of(draft_id, &session)))
}

/// Dismiss the current notice.
#[utoipa::path(
    delete,
    path = "/drafts/{draft_id}/notice",
    responses(
        (status = 200, description = "Notice cleared", body = DraftView),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn dismiss_notice_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = find_draft(&app_state, draft_id).await?;
    let mut session = session.lock().await;
    session.dismiss_notice();
    Ok(Json(DraftView::of(draft_id, &session)))
}

/// Upload a banner image for the draft's course.
///
/// Accepts a multipart/form-data request with a single image part. The file is
/// checked right away; the upload itself continues in the background and its
/// progress shows up in `banner_upload` on the draft.
#[utoipa::path(
    post,
    path = "/drafts/{draft_id}/banner",
    request_body(content_type = "multipart/form-data", description = "The banner image (image/*, at most 5 MiB)."),
    responses(
        (status = 202, description = "Upload started", body = DraftView),
        (status = 422, description = "File refused; see `notice`", body = DraftView),
        (status = 400, description = "Missing or unreadable file part"),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn upload_banner_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let shared = find_draft(&app_state, draft_id).await?;

    let file = if let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let name = field.file_name().unwrap_or("banner").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        AssetFile::new(name, content_type, data)
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    };

    let mut session = shared.lock().await;
    let outcome = session.begin_banner_upload(&file);
    if outcome.is_err() {
        return Ok(view_response(draft_id, &session, &outcome));
    }
    let view = DraftView::of(draft_id, &session);
    drop(session);

    tokio::spawn(run_banner_upload(app_state.clone(), shared, file));
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// Runs one banner upload, forwarding progress into the session and writing the
/// final URL (or the failure) through the same session lock.
async fn run_banner_upload(app_state: Arc<AppState>, session: SharedSession, file: AssetFile) {
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<u8>();
    let progress_session = session.clone();
    let forward = tokio::spawn(async move {
        while let Some(percent) = progress_rx.recv().await {
            progress_session.lock().await.report_banner_progress(percent);
        }
    });

    let on_progress = move |percent: u8| {
        let _ = progress_tx.send(percent);
    };
    let result = upload_banner(app_state.uploader.as_ref(), &file, &on_progress).await;
    drop(on_progress);
    let _ = forward.await;

    if let Err(e) = &result {
        error!("Banner upload of {} failed: {}", file.file_name, e);
    }
    session.lock().await.finish_banner_upload(result);
}

/// Commit the draft's course to storage.
///
/// Only possible from the review step once every step is complete. A failed
/// commit can be retried; the retry writes under the same course id.
#[utoipa::path(
    post,
    path = "/drafts/{draft_id}/submit",
    responses(
        (status = 201, description = "Course committed", body = SubmitResponse),
        (status = 409, description = "Draft is not ready to submit"),
        (status = 502, description = "Storage rejected the course"),
        (status = 503, description = "No free course id"),
        (status = 404, description = "Unknown draft")
    ),
    params(("draft_id" = Uuid, Path, description = "Draft id"))
)]
pub async fn submit_handler(
    State(app_state): State<Arc<AppState>>,
    Path(draft_id): Path<Uuid>,
) -> Result<impl IntoResponse, HandlerError> {
    let session = find_draft(&app_state, draft_id).await?;
    let mut session = session.lock().await;

    match session.submit(app_state.store.as_ref()).await {
        Ok(course_id) => {
            info!("Draft {} committed as course {}", draft_id, course_id);
            Ok((
                StatusCode::CREATED,
                Json(SubmitResponse {
                    course_id: course_id.to_string(),
                }),
            ))
        }
        Err(SubmitError::Gate(e)) => Err((StatusCode::CONFLICT, e.to_string())),
        Err(e @ SubmitError::NoFreeCourseId { .. }) => {
            error!("Failed to commit draft {}: {}", draft_id, e);
            Err((StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
        }
        Err(e @ SubmitError::Storage(_)) => {
            error!("Failed to commit draft {}: {:?}", draft_id, e);
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
        Err(e) => {
            error!("Failed to commit draft {}: {:?}", draft_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to commit course".to_string(),
            ))
        }
    }
}

/// Read a committed course document.
#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    responses(
        (status = 200, description = "The stored course document"),
        (status = 404, description = "No course with this id"),
        (status = 500, description = "Internal server error")
    ),
    params(("course_id" = String, Path, description = "Six digit course id"))
)]
pub async fn get_course_handler(
    State(app_state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    match app_state
        .store
        .get_document(COURSES_COLLECTION, &course_id)
        .await
    {
        Ok(Some(document)) => Ok(Json(document)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            format!("Course {} not found", course_id),
        )),
        Err(e) => {
            error!("Failed to load course {}: {:?}", course_id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load course".to_string(),
            ))
        }
    }
}
