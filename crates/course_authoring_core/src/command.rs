//! crates/course_authoring_core/src/command.rs
//!
//! The single write path into a `Course`. Editors never touch the aggregate
//! directly; they produce a `CourseCommand` and the session applies it here.
//!
//! `Course::apply` checks everything it needs before the first write, so a
//! rejected command leaves the course exactly as it was.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::{Course, Lesson};
use crate::editors::basic_info::CourseField;
use crate::error::{EditError, EditResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CourseCommand {
    SetField(CourseField),
    AddFeature { text: String },
    RemoveFeature { index: usize },
    SetBanner { url: String },
    AddChapter { title: String, duration: String },
    AppendLesson { chapter: usize, lesson: Lesson },
    ReplaceLesson { chapter: usize, index: usize, lesson: Lesson },
    DeleteLesson { chapter: usize, index: usize },
}

impl Course {
    pub fn apply(&mut self, command: &CourseCommand) -> EditResult<()> {
        trace!(?command, "applying course command");
        match command {
            CourseCommand::SetField(field) => {
                self.set_field(field.clone());
                Ok(())
            }
            CourseCommand::AddFeature { text } => self.add_feature(text),
            CourseCommand::RemoveFeature { index } => self.remove_feature(*index).map(|_| ()),
            CourseCommand::SetBanner { url } => {
                self.set_banner(url.as_str());
                Ok(())
            }
            CourseCommand::AddChapter { title, duration } => self.add_chapter(title, duration),
            CourseCommand::AppendLesson { chapter, lesson } => {
                lesson.validate()?;
                self.chapter_mut(*chapter)?.lessons.push(lesson.clone());
                Ok(())
            }
            CourseCommand::ReplaceLesson {
                chapter,
                index,
                lesson,
            } => {
                lesson.validate()?;
                let slot = self
                    .chapter_mut(*chapter)?
                    .lessons
                    .get_mut(*index)
                    .ok_or(EditError::OutOfRange {
                        kind: "lesson",
                        index: *index,
                    })?;
                *slot = lesson.clone();
                Ok(())
            }
            CourseCommand::DeleteLesson { chapter, index } => {
                let lessons = &mut self.chapter_mut(*chapter)?.lessons;
                if *index >= lessons.len() {
                    return Err(EditError::OutOfRange {
                        kind: "lesson",
                        index: *index,
                    });
                }
                lessons.remove(*index);
                Ok(())
            }
        }
    }
}

/// Reducer form of [`Course::apply`]: consumes the aggregate and hands back the
/// next one. On rejection the untouched aggregate is returned with the error.
pub fn apply_command(mut course: Course, command: &CourseCommand) -> (Course, EditResult<()>) {
    let outcome = course.apply(command);
    (course, outcome)
}

impl Lesson {
    /// Checks that the lesson can be stored in a chapter.
    pub fn validate(&self) -> EditResult<()> {
        if self.title.trim().is_empty() {
            return Err(EditError::Required("Lesson title"));
        }
        if self.key_points.iter().any(|k| k.title.trim().is_empty()) {
            return Err(EditError::Required("Key point title"));
        }
        for quiz in &self.quiz {
            quiz.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LessonType;

    fn lesson(title: &str) -> Lesson {
        Lesson {
            title: title.to_string(),
            lesson_type: LessonType::Reading,
            duration: "5m".to_string(),
            ..Lesson::default()
        }
    }

    fn course_with_chapter() -> Course {
        let mut course = Course::default();
        course
            .apply(&CourseCommand::AddChapter {
                title: "Basics".to_string(),
                duration: "1h".to_string(),
            })
            .unwrap();
        course
    }

    #[test]
    fn rejected_command_leaves_course_unchanged() {
        let course = course_with_chapter();
        let before = course.clone();
        let (after, outcome) = apply_command(
            course,
            &CourseCommand::AppendLesson {
                chapter: 3,
                lesson: lesson("Intro"),
            },
        );
        assert_eq!(
            outcome,
            Err(EditError::OutOfRange {
                kind: "chapter",
                index: 3
            })
        );
        assert_eq!(after, before);
    }

    #[test]
    fn untitled_lesson_is_refused() {
        let mut course = course_with_chapter();
        let result = course.apply(&CourseCommand::AppendLesson {
            chapter: 0,
            lesson: lesson(" "),
        });
        assert_eq!(result, Err(EditError::Required("Lesson title")));
        assert!(course.chapters[0].lessons.is_empty());
    }

    #[test]
    fn replace_and_delete_target_one_index() {
        let mut course = course_with_chapter();
        for title in ["A", "B", "C"] {
            course
                .apply(&CourseCommand::AppendLesson {
                    chapter: 0,
                    lesson: lesson(title),
                })
                .unwrap();
        }
        course
            .apply(&CourseCommand::ReplaceLesson {
                chapter: 0,
                index: 1,
                lesson: lesson("B2"),
            })
            .unwrap();
        course
            .apply(&CourseCommand::DeleteLesson { chapter: 0, index: 0 })
            .unwrap();
        let titles: Vec<_> = course.chapters[0].lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["B2", "C"]);
        assert!(course
            .apply(&CourseCommand::DeleteLesson { chapter: 0, index: 2 })
            .is_err());
    }

    #[test]
    fn command_json_is_tagged_by_type() {
        let command: CourseCommand =
            serde_json::from_str(r#"{"type":"add_feature","text":"Mentorship"}"#).unwrap();
        assert_eq!(
            command,
            CourseCommand::AddFeature {
                text: "Mentorship".to_string()
            }
        );
    }
}
