//! crates/course_authoring_core/src/error.rs
//!
//! Error types for the authoring engine. Validation failures are ordinary
//! values: the session turns them into a dismissible `Notice` instead of
//! unwinding the wizard.

use serde::Serialize;

use crate::ports::PortError;
use crate::wizard::WizardStep;

/// A local, recoverable validation failure raised by one of the editors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Feature cannot be empty")]
    EmptyFeature,
    #[error("Feature '{0}' is already listed")]
    DuplicateFeature(String),
    #[error("No {kind} at position {index}")]
    OutOfRange { kind: &'static str, index: usize },
    #[error("Select a chapter first")]
    NoChapterSelected,
    #[error("Every quiz option must be filled in")]
    EmptyQuizOption,
    #[error("A quiz question needs at least one option")]
    LastQuizOption,
    #[error("Correct answer {index} is not one of the {len} options")]
    AnswerOutOfRange { index: usize, len: usize },
    #[error("Only image files can be used as a banner (got '{0}')")]
    UnsupportedImageType(String),
    #[error("Banner image is {size} bytes; the limit is {max} bytes")]
    ImageTooLarge { size: usize, max: usize },
    #[error("A banner upload is already in progress")]
    UploadInProgress,
    #[error("Finish or cancel the lesson being composed first")]
    LessonInProgress,
    #[error("Step {step} is incomplete: {reason}")]
    StepIncomplete { step: WizardStep, reason: String },
    #[error("Courses can only be submitted from the review step")]
    NotOnReviewStep,
}

/// Failure of the final commit. The aggregate is left untouched in every case.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Course is not ready to submit: {0}")]
    Gate(#[from] EditError),
    #[error("Failed to serialize the course: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage rejected the course: {0}")]
    Storage(#[from] PortError),
    #[error("No free course id found after {attempts} attempts")]
    NoFreeCourseId { attempts: usize },
}

/// A transient, user-visible message tied to the last attempted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
}

impl From<&EditError> for Notice {
    fn from(err: &EditError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl From<&SubmitError> for Notice {
    fn from(err: &SubmitError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// A convenience alias for editor operations.
pub type EditResult<T> = Result<T, EditError>;
