//! crates/course_authoring_core/src/document.rs
//!
//! The committed form of a course: the authored tree plus the fields the system
//! attaches at submit time.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::Course;

/// Collection that committed courses are written to.
pub const COURSES_COLLECTION: &str = "courses";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
}

/// A random six digit course identifier, e.g. `"482913"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn generate() -> Self {
        let n = Uuid::new_v4().as_u128() % 900_000 + 100_000;
        Self(n.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    #[serde(flatten)]
    pub course: Course,
    pub course_id: CourseId,
    pub created_at: DateTime<Utc>,
    pub status: CourseStatus,
    pub month: u32,
    pub year: i32,
}

impl CourseDocument {
    pub fn new(course: Course, course_id: CourseId, created_at: DateTime<Utc>) -> Self {
        Self {
            course,
            course_id,
            created_at,
            status: CourseStatus::Draft,
            month: created_at.month(),
            year: created_at.year(),
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}
