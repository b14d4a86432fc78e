pub mod command;
pub mod document;
pub mod domain;
pub mod editors;
pub mod error;
pub mod ports;
pub mod review;
pub mod wizard;

pub use command::{apply_command, CourseCommand};
pub use document::{CourseDocument, CourseId, CourseStatus, COURSES_COLLECTION};
pub use domain::{Chapter, Course, KeyPoint, Lesson, LessonType, QuizQuestion};
pub use editors::banner::{upload_banner, BannerUpload, BannerUploadError, MAX_BANNER_BYTES};
pub use editors::basic_info::CourseField;
pub use editors::lessons::{ComposeMode, LessonEditorState, LessonField};
pub use error::{EditError, EditResult, Notice, SubmitError};
pub use ports::{AssetFile, AssetUploader, DocumentStore, PortError, PortResult, PutOutcome};
pub use review::{ChapterSummary, CourseReview};
pub use wizard::{AuthoringSession, Command, WizardStep};
