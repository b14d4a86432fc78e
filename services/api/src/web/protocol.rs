//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the authoring client and the
//! API server.

use course_authoring_core::editors::banner::BannerUpload;
use course_authoring_core::editors::chapters::ChapterListView;
use course_authoring_core::editors::lessons::LessonEditor;
use course_authoring_core::error::Notice;
use course_authoring_core::review::CourseReview;
use course_authoring_core::wizard::{AuthoringSession, WizardStep};
use course_authoring_core::Course;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Server TO the Client
//=========================================================================================

/// Everything the client needs to render one draft.
#[derive(Serialize, Debug, ToSchema)]
pub struct DraftView {
    pub draft_id: Uuid,
    /// 1 to 4.
    pub step: u8,
    #[schema(value_type = String)]
    pub step_name: WizardStep,
    #[schema(value_type = Object)]
    pub course: Course,
    #[schema(value_type = Object)]
    pub chapter_view: ChapterListView,
    #[schema(value_type = Object)]
    pub lesson_editor: LessonEditor,
    #[schema(value_type = Object)]
    pub banner_upload: BannerUpload,
    #[schema(value_type = Option<Object>)]
    pub notice: Option<Notice>,
    #[schema(value_type = Object)]
    pub review: CourseReview,
}

impl DraftView {
    pub fn of(draft_id: Uuid, session: &AuthoringSession) -> Self {
        Self {
            draft_id,
            step: session.step().number(),
            step_name: session.step(),
            course: session.course().clone(),
            chapter_view: session.chapter_view().clone(),
            lesson_editor: session.lesson_editor().clone(),
            banner_upload: session.banner_upload().clone(),
            notice: session.notice().cloned(),
            review: session.review(),
        }
    }
}

/// The response payload sent after a course was committed.
#[derive(Serialize, Debug, ToSchema)]
pub struct SubmitResponse {
    pub course_id: String,
}
