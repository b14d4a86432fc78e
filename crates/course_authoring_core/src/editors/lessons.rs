//! The lesson editor state machine.
//!
//! ```text
//! NoChapterSelected --select--> ChapterSelected --edit draft--> Composing(create)
//!                                     |                              |
//!                                     +--start_edit--> Composing(edit)
//!                                     ^                              |
//!                                     +-------- commit / cancel -----+
//! ```
//!
//! The editor owns the lesson draft and the quiz question being composed. It
//! never writes to the course; committing yields a `CourseCommand` for the
//! session to apply.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::CourseCommand;
use crate::domain::{Course, KeyPoint, Lesson, LessonType, QuizQuestion};
use crate::error::{EditError, EditResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ComposeMode {
    Create,
    /// Saving replaces the lesson at this index of the selected chapter.
    Edit { lesson: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LessonEditorState {
    #[default]
    NoChapterSelected,
    ChapterSelected {
        chapter: usize,
    },
    Composing {
        chapter: usize,
        #[serde(flatten)]
        mode: ComposeMode,
    },
}

/// One scalar field of the lesson draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LessonField {
    Title(String),
    Type(LessonType),
    Duration(String),
    Content(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LessonEditor {
    state: LessonEditorState,
    draft: Lesson,
    quiz_draft: QuizQuestion,
}

impl LessonEditor {
    pub fn state(&self) -> LessonEditorState {
        self.state
    }

    pub fn draft(&self) -> &Lesson {
        &self.draft
    }

    pub fn quiz_draft(&self) -> &QuizQuestion {
        &self.quiz_draft
    }

    pub fn selected_chapter(&self) -> Option<usize> {
        match self.state {
            LessonEditorState::NoChapterSelected => None,
            LessonEditorState::ChapterSelected { chapter }
            | LessonEditorState::Composing { chapter, .. } => Some(chapter),
        }
    }

    pub fn is_composing(&self) -> bool {
        matches!(self.state, LessonEditorState::Composing { .. })
    }

    pub fn select_chapter(&mut self, course: &Course, chapter: usize) -> EditResult<()> {
        course.chapter(chapter)?;
        self.state = LessonEditorState::ChapterSelected { chapter };
        self.reset_drafts();
        Ok(())
    }

    /// Re-opens an existing lesson, seeding the draft with a copy of it.
    pub fn start_edit(&mut self, course: &Course, chapter: usize, lesson: usize) -> EditResult<()> {
        let existing = course
            .chapter(chapter)?
            .lessons
            .get(lesson)
            .ok_or(EditError::OutOfRange {
                kind: "lesson",
                index: lesson,
            })?;
        debug!(chapter, lesson, "editing existing lesson");
        self.draft = existing.clone();
        self.quiz_draft = QuizQuestion::default();
        self.state = LessonEditorState::Composing {
            chapter,
            mode: ComposeMode::Edit { lesson },
        };
        Ok(())
    }

    /// Drops the draft and returns to the selected chapter.
    pub fn cancel(&mut self) {
        if let Some(chapter) = self.selected_chapter() {
            self.state = LessonEditorState::ChapterSelected { chapter };
        }
        self.reset_drafts();
    }

    pub fn set_field(&mut self, field: LessonField) -> EditResult<()> {
        let draft = self.compose()?;
        match field {
            LessonField::Title(title) => draft.title = title,
            LessonField::Type(lesson_type) => draft.lesson_type = lesson_type,
            LessonField::Duration(duration) => draft.duration = duration,
            LessonField::Content(content) => draft.content = content,
        }
        Ok(())
    }

    pub fn add_key_point(&mut self, title: &str, description: &str) -> EditResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EditError::Required("Key point title"));
        }
        self.compose()?.key_points.push(KeyPoint {
            title: title.to_string(),
            description: description.trim().to_string(),
        });
        Ok(())
    }

    pub fn remove_key_point(&mut self, index: usize) -> EditResult<()> {
        let key_points = &mut self.compose()?.key_points;
        if index >= key_points.len() {
            return Err(EditError::OutOfRange {
                kind: "key point",
                index,
            });
        }
        key_points.remove(index);
        Ok(())
    }

    /// Appends a complete question to the draft's quiz.
    pub fn add_quiz_question(
        &mut self,
        question: &str,
        options: Vec<String>,
        correct_answer: usize,
    ) -> EditResult<()> {
        self.require_chapter()?;
        let quiz = QuizQuestion::from_parts(question, options, correct_answer)?;
        self.compose()?.quiz.push(quiz);
        Ok(())
    }

    pub fn remove_quiz_question(&mut self, index: usize) -> EditResult<()> {
        let quiz = &mut self.compose()?.quiz;
        if index >= quiz.len() {
            return Err(EditError::OutOfRange {
                kind: "quiz question",
                index,
            });
        }
        quiz.remove(index);
        Ok(())
    }

    // --- Quiz question draft, composed option by option ---

    pub fn set_quiz_text(&mut self, text: &str) -> EditResult<()> {
        self.compose()?;
        self.quiz_draft.set_question(text);
        Ok(())
    }

    pub fn set_quiz_option(&mut self, index: usize, text: &str) -> EditResult<()> {
        self.compose()?;
        self.quiz_draft.set_option(index, text)
    }

    pub fn add_quiz_option(&mut self) -> EditResult<()> {
        self.compose()?;
        self.quiz_draft.add_option();
        Ok(())
    }

    pub fn remove_quiz_option(&mut self, index: usize) -> EditResult<()> {
        self.compose()?;
        self.quiz_draft.remove_option(index)
    }

    pub fn set_correct_answer(&mut self, index: usize) -> EditResult<()> {
        self.compose()?;
        self.quiz_draft.set_correct_answer(index)
    }

    /// Validates the quiz draft, appends it to the lesson draft and starts a
    /// fresh one.
    pub fn commit_quiz_draft(&mut self) -> EditResult<()> {
        self.compose()?;
        let QuizQuestion {
            question,
            options,
            correct_answer,
        } = self.quiz_draft.clone();
        self.add_quiz_question(&question, options, correct_answer)?;
        self.quiz_draft = QuizQuestion::default();
        Ok(())
    }

    // --- Commit ---

    /// Builds the command that stores the draft: an append in create mode, a
    /// replacement in edit mode. Call [`LessonEditor::finish_commit`] once the
    /// command has been applied.
    pub fn prepare_commit(&self) -> EditResult<CourseCommand> {
        let chapter = self.require_chapter()?;
        if self.draft.title.trim().is_empty() {
            return Err(EditError::Required("Lesson title"));
        }
        let mut lesson = self.draft.clone();
        lesson.title = lesson.title.trim().to_string();
        match self.state {
            LessonEditorState::Composing {
                mode: ComposeMode::Edit { lesson: index },
                ..
            } => Ok(CourseCommand::ReplaceLesson {
                chapter,
                index,
                lesson,
            }),
            _ => Ok(CourseCommand::AppendLesson { chapter, lesson }),
        }
    }

    pub fn finish_commit(&mut self) {
        self.cancel();
    }

    /// Keeps the editing index pointing at the same lesson after a lesson of
    /// the selected chapter was removed.
    pub fn lesson_deleted(&mut self, chapter: usize, index: usize) {
        if let LessonEditorState::Composing {
            chapter: selected,
            mode: ComposeMode::Edit { lesson },
        } = self.state
        {
            if selected != chapter {
                return;
            }
            if lesson == index {
                debug!(chapter, index, "lesson under edit was deleted");
                self.cancel();
            } else if index < lesson {
                self.state = LessonEditorState::Composing {
                    chapter,
                    mode: ComposeMode::Edit { lesson: lesson - 1 },
                };
            }
        }
    }

    fn require_chapter(&self) -> EditResult<usize> {
        self.selected_chapter().ok_or(EditError::NoChapterSelected)
    }

    fn compose(&mut self) -> EditResult<&mut Lesson> {
        match self.state {
            LessonEditorState::NoChapterSelected => return Err(EditError::NoChapterSelected),
            LessonEditorState::ChapterSelected { chapter } => {
                self.state = LessonEditorState::Composing {
                    chapter,
                    mode: ComposeMode::Create,
                };
            }
            LessonEditorState::Composing { .. } => {}
        }
        Ok(&mut self.draft)
    }

    fn reset_drafts(&mut self) {
        self.draft = Lesson::default();
        self.quiz_draft = QuizQuestion::default();
    }
}

/// A half-composed lesson blocks leaving the lessons step.
pub fn check_lessons(editor: &LessonEditor) -> EditResult<()> {
    if editor.is_composing() {
        return Err(EditError::LessonInProgress);
    }
    Ok(())
}
