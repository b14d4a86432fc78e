//! crates/course_authoring_core/src/review.rs
//!
//! Read-only summary of a course shown on the final wizard step.

use serde::Serialize;

use crate::domain::Course;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterSummary {
    pub title: String,
    pub lesson_count: usize,
    /// Titles of lessons that have neither key points nor quiz questions.
    pub lessons_without_content: Vec<String>,
}

impl ChapterSummary {
    pub fn is_empty(&self) -> bool {
        self.lesson_count == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseReview {
    pub chapter_count: usize,
    pub lesson_count: usize,
    pub chapters: Vec<ChapterSummary>,
    pub warnings: Vec<String>,
}

impl CourseReview {
    pub fn of(course: &Course) -> Self {
        let chapters: Vec<ChapterSummary> = course
            .chapters
            .iter()
            .map(|chapter| ChapterSummary {
                title: chapter.title.clone(),
                lesson_count: chapter.lessons.len(),
                lessons_without_content: chapter
                    .lessons
                    .iter()
                    .filter(|l| l.key_points.is_empty() && l.quiz.is_empty())
                    .map(|l| l.title.clone())
                    .collect(),
            })
            .collect();

        let mut warnings = Vec::new();
        for chapter in &chapters {
            if chapter.is_empty() {
                warnings.push(format!("Chapter '{}' has no lessons", chapter.title));
            }
            for lesson in &chapter.lessons_without_content {
                warnings.push(format!(
                    "Lesson '{}' in '{}' has no key points or quiz",
                    lesson, chapter.title
                ));
            }
        }

        Self {
            chapter_count: chapters.len(),
            lesson_count: course.lesson_count(),
            chapters,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KeyPoint, Lesson};

    #[test]
    fn flags_empty_chapters_and_bare_lessons() {
        let mut course = Course::default();
        course.add_chapter("Basics", "1h").unwrap();
        course.add_chapter("Advanced", "3h").unwrap();
        course.chapters[0].lessons.push(Lesson {
            title: "Intro".to_string(),
            ..Lesson::default()
        });
        course.chapters[0].lessons.push(Lesson {
            title: "Charts".to_string(),
            key_points: vec![KeyPoint {
                title: "Timeframes".to_string(),
                description: String::new(),
            }],
            ..Lesson::default()
        });

        let review = CourseReview::of(&course);
        assert_eq!(review.chapter_count, 2);
        assert_eq!(review.lesson_count, 2);
        assert_eq!(review.chapters[0].lesson_count, 2);
        assert_eq!(review.chapters[0].lessons_without_content, vec!["Intro"]);
        assert!(review.chapters[1].is_empty());
        assert_eq!(review.warnings.len(), 2);
    }
}
