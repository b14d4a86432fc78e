//! crates/course_authoring_core/src/domain.rs
//!
//! Defines the course tree that an instructor builds in the authoring wizard.
//! The serialized field names are the storage shape read by the catalog and the
//! content viewer, so they are fixed by `serde` attributes here.

use serde::{Deserialize, Serialize};

/// Longest description accepted on a course, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Allowed range of `Course::duration`, in months.
pub const MIN_DURATION_MONTHS: u8 = 1;
pub const MAX_DURATION_MONTHS: u8 = 12;

/// Number of blank options a new quiz question starts with.
pub const DEFAULT_QUIZ_OPTIONS: usize = 4;

/// The root aggregate. Owns every chapter, lesson, key point and quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    pub instructor: String,
    pub description: String,
    pub duration: u8,
    pub price: f64,
    #[serde(default)]
    pub banner: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            name: String::new(),
            instructor: String::new(),
            description: String::new(),
            duration: MIN_DURATION_MONTHS,
            price: 0.0,
            banner: String::new(),
            features: Vec::new(),
            chapters: Vec::new(),
        }
    }
}

impl Course {
    /// Total number of lessons across all chapters.
    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lessons.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub title: String,
    pub duration: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    #[default]
    Video,
    Reading,
    Assignment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub duration: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<KeyPoint>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A multiple-choice question. `correct_answer` always indexes into `options`;
/// the methods in `editors::quiz` keep it that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl Default for QuizQuestion {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: vec![String::new(); DEFAULT_QUIZ_OPTIONS],
            correct_answer: 0,
        }
    }
}
