//! crates/course_authoring_core/src/wizard.rs
//!
//! The authoring wizard. `AuthoringSession` owns the one `Course` being built,
//! the editor states and the current step, and is the only thing that writes
//! to the course. Every user action arrives as a `Command`; validation
//! failures become a dismissible `Notice` and never unwind the session.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::command::CourseCommand;
use crate::document::{CourseDocument, CourseId, COURSES_COLLECTION};
use crate::domain::Course;
use crate::editors::banner::{BannerUpload, BannerUploadError};
use crate::editors::basic_info::{check_basic_info, CourseField};
use crate::editors::chapters::{check_chapters, ChapterListView};
use crate::editors::lessons::{check_lessons, LessonEditor, LessonField};
use crate::error::{EditError, EditResult, Notice, SubmitError};
use crate::ports::{AssetFile, DocumentStore, PutOutcome};
use crate::review::CourseReview;

//=========================================================================================
// Steps and Gates
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    BasicInfo = 1,
    Chapters = 2,
    Lessons = 3,
    Review = 4,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    fn following(self) -> Self {
        match self {
            Self::BasicInfo => Self::Chapters,
            Self::Chapters => Self::Lessons,
            Self::Lessons | Self::Review => Self::Review,
        }
    }

    fn preceding(self) -> Self {
        match self {
            Self::BasicInfo | Self::Chapters => Self::BasicInfo,
            Self::Lessons => Self::Chapters,
            Self::Review => Self::Lessons,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::BasicInfo => "basic info",
            Self::Chapters => "chapters",
            Self::Lessons => "lessons",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

/// Checks whether `step` is complete enough to move past it.
pub fn gate(step: WizardStep, course: &Course, lessons: &LessonEditor) -> EditResult<()> {
    let outcome = match step {
        WizardStep::BasicInfo => check_basic_info(course),
        WizardStep::Chapters => check_chapters(course),
        WizardStep::Lessons => check_lessons(lessons),
        WizardStep::Review => return Ok(()),
    };
    outcome.map_err(|e| EditError::StepIncomplete {
        step,
        reason: e.to_string(),
    })
}

//=========================================================================================
// Commands
//=========================================================================================

/// Every editing action the wizard accepts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // --- Basic info ---
    SetField(CourseField),
    AddFeature { text: String },
    RemoveFeature { index: usize },
    SetBanner { url: String },

    // --- Chapters ---
    AddChapter {
        title: String,
        #[serde(default)]
        duration: String,
    },
    ToggleChapterLessons { index: usize },

    // --- Lessons ---
    SelectChapter { index: usize },
    StartEditLesson { chapter: usize, lesson: usize },
    CancelLesson,
    SetLessonField(LessonField),
    AddKeyPoint {
        title: String,
        #[serde(default)]
        description: String,
    },
    RemoveKeyPoint { index: usize },
    AddQuizQuestion {
        question: String,
        options: Vec<String>,
        correct_answer: usize,
    },
    RemoveQuizQuestion { index: usize },
    SetQuizText { text: String },
    SetQuizOption { index: usize, text: String },
    AddQuizOption,
    RemoveQuizOption { index: usize },
    SetCorrectAnswer { index: usize },
    CommitQuizDraft,
    CommitLesson,
    DeleteLesson { chapter: usize, lesson: usize },
}

//=========================================================================================
// The Session
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct AuthoringSession {
    course: Course,
    step: WizardStep,
    chapter_view: ChapterListView,
    lessons: LessonEditor,
    banner: BannerUpload,
    notice: Option<Notice>,
    pending_commit: Option<PendingCommit>,
}

/// Identity reserved by the first submit attempt and reused by retries.
#[derive(Debug, Clone)]
struct PendingCommit {
    course_id: CourseId,
    /// Marks documents written by this session; only they may be replaced.
    commit_key: Uuid,
    created_at: DateTime<Utc>,
}

impl PendingCommit {
    fn reserve() -> Self {
        Self {
            course_id: CourseId::generate(),
            commit_key: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }
}

/// Fresh ids drawn per submit before giving up on a crowded id space.
const MAX_ID_ATTEMPTS: usize = 8;

impl AuthoringSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn lesson_editor(&self) -> &LessonEditor {
        &self.lessons
    }

    pub fn chapter_view(&self) -> &ChapterListView {
        &self.chapter_view
    }

    pub fn banner_upload(&self) -> &BannerUpload {
        &self.banner
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn review(&self) -> CourseReview {
        CourseReview::of(&self.course)
    }

    /// Applies one editing action. A rejected action leaves the course as it
    /// was and sets the notice; a successful one clears it.
    pub fn dispatch(&mut self, command: Command) -> EditResult<()> {
        let outcome = self.handle(command);
        self.record(outcome)
    }

    // --- Navigation ---

    /// Moves one step forward if the current step passes its gate.
    pub fn next(&mut self) -> EditResult<WizardStep> {
        if self.step == WizardStep::Review {
            return Ok(self.step);
        }
        let outcome = gate(self.step, &self.course, &self.lessons);
        self.record(outcome)?;
        self.step = self.step.following();
        debug!(step = %self.step, "advanced wizard");
        Ok(self.step)
    }

    pub fn prev(&mut self) -> WizardStep {
        self.step = self.step.preceding();
        self.step
    }

    // --- Banner upload ---

    pub fn begin_banner_upload(&mut self, file: &AssetFile) -> EditResult<()> {
        let outcome = self.banner.begin(file);
        self.record(outcome)
    }

    pub fn report_banner_progress(&mut self, percent: u8) {
        self.banner.report_progress(percent);
    }

    /// Writes the uploaded URL into the course. On failure the previous
    /// banner stays and the failure becomes the notice.
    pub fn finish_banner_upload(&mut self, result: Result<String, BannerUploadError>) -> bool {
        match self.banner.finish(result) {
            Some(url) => {
                self.course.set_banner(url);
                true
            }
            None => {
                self.notice = self.banner.error.clone().map(|message| Notice { message });
                false
            }
        }
    }

    // --- Submit ---

    /// Commits the course. Only allowed from the review step once every step
    /// passes its gate.
    ///
    /// On success the session starts over with an empty course. On failure the
    /// course and step stay as they were. A retry writes with the same commit
    /// key, so an unacknowledged earlier write is replaced rather than
    /// duplicated. An id held by another course is never overwritten; a new
    /// one is drawn instead.
    pub async fn submit(&mut self, store: &dyn DocumentStore) -> Result<CourseId, SubmitError> {
        match self.commit(store).await {
            Ok(course_id) => {
                info!(%course_id, name = %self.course.name, "course committed");
                *self = Self::default();
                Ok(course_id)
            }
            Err(e) => {
                error!("failed to commit course: {}", e);
                self.notice = Some(Notice::from(&e));
                Err(e)
            }
        }
    }

    async fn commit(&mut self, store: &dyn DocumentStore) -> Result<CourseId, SubmitError> {
        self.check_submittable()?;
        for _ in 0..MAX_ID_ATTEMPTS {
            let pending = self
                .pending_commit
                .get_or_insert_with(PendingCommit::reserve)
                .clone();
            let document =
                CourseDocument::new(self.course.clone(), pending.course_id.clone(), pending.created_at);
            let outcome = store
                .put_document(
                    COURSES_COLLECTION,
                    pending.course_id.as_str(),
                    &pending.commit_key.to_string(),
                    document.to_value()?,
                )
                .await?;
            match outcome {
                PutOutcome::Stored => return Ok(pending.course_id),
                PutOutcome::IdTaken => {
                    warn!(course_id = %pending.course_id, "course id already taken, drawing another");
                    if let Some(pending) = self.pending_commit.as_mut() {
                        pending.course_id = CourseId::generate();
                    }
                }
            }
        }
        Err(SubmitError::NoFreeCourseId {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn check_submittable(&self) -> Result<(), SubmitError> {
        if self.step != WizardStep::Review {
            return Err(EditError::NotOnReviewStep.into());
        }
        for step in [WizardStep::BasicInfo, WizardStep::Chapters, WizardStep::Lessons] {
            gate(step, &self.course, &self.lessons)?;
        }
        if self.banner.pending {
            return Err(EditError::UploadInProgress.into());
        }
        Ok(())
    }

    fn record(&mut self, outcome: EditResult<()>) -> EditResult<()> {
        match &outcome {
            Ok(()) => self.notice = None,
            Err(e) => {
                debug!("editing action refused: {}", e);
                self.notice = Some(Notice::from(e));
            }
        }
        outcome
    }

    fn handle(&mut self, command: Command) -> EditResult<()> {
        match command {
            Command::SetField(field) => self.course.apply(&CourseCommand::SetField(field)),
            Command::AddFeature { text } => self.course.apply(&CourseCommand::AddFeature { text }),
            Command::RemoveFeature { index } => {
                self.course.apply(&CourseCommand::RemoveFeature { index })
            }
            Command::SetBanner { .. } if self.banner.pending => Err(EditError::UploadInProgress),
            Command::SetBanner { url } => self.course.apply(&CourseCommand::SetBanner { url }),
            Command::AddChapter { title, duration } => self
                .course
                .apply(&CourseCommand::AddChapter { title, duration }),
            Command::ToggleChapterLessons { index } => {
                self.chapter_view.toggle(&self.course, index).map(|_| ())
            }
            Command::SelectChapter { index } => self.lessons.select_chapter(&self.course, index),
            Command::StartEditLesson { chapter, lesson } => {
                self.lessons.start_edit(&self.course, chapter, lesson)
            }
            Command::CancelLesson => {
                self.lessons.cancel();
                Ok(())
            }
            Command::SetLessonField(field) => self.lessons.set_field(field),
            Command::AddKeyPoint { title, description } => {
                self.lessons.add_key_point(&title, &description)
            }
            Command::RemoveKeyPoint { index } => self.lessons.remove_key_point(index),
            Command::AddQuizQuestion {
                question,
                options,
                correct_answer,
            } => self
                .lessons
                .add_quiz_question(&question, options, correct_answer),
            Command::RemoveQuizQuestion { index } => self.lessons.remove_quiz_question(index),
            Command::SetQuizText { text } => self.lessons.set_quiz_text(&text),
            Command::SetQuizOption { index, text } => self.lessons.set_quiz_option(index, &text),
            Command::AddQuizOption => self.lessons.add_quiz_option(),
            Command::RemoveQuizOption { index } => self.lessons.remove_quiz_option(index),
            Command::SetCorrectAnswer { index } => self.lessons.set_correct_answer(index),
            Command::CommitQuizDraft => self.lessons.commit_quiz_draft(),
            Command::CommitLesson => {
                let command = self.lessons.prepare_commit()?;
                self.course.apply(&command)?;
                self.lessons.finish_commit();
                Ok(())
            }
            Command::DeleteLesson { chapter, lesson } => {
                self.course.apply(&CourseCommand::DeleteLesson {
                    chapter,
                    index: lesson,
                })?;
                self.lessons.lesson_deleted(chapter, lesson);
                Ok(())
            }
        }
    }
}
