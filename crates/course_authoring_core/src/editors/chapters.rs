//! Chapter list editing. Chapters are only ever appended.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{Chapter, Course};
use crate::error::{EditError, EditResult};

impl Course {
    pub fn add_chapter(&mut self, title: &str, duration: &str) -> EditResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EditError::Required("Chapter title"));
        }
        self.chapters.push(Chapter {
            title: title.to_string(),
            duration: duration.trim().to_string(),
            lessons: Vec::new(),
        });
        Ok(())
    }

    pub fn chapter(&self, index: usize) -> EditResult<&Chapter> {
        self.chapters.get(index).ok_or(EditError::OutOfRange {
            kind: "chapter",
            index,
        })
    }

    pub fn chapter_mut(&mut self, index: usize) -> EditResult<&mut Chapter> {
        self.chapters.get_mut(index).ok_or(EditError::OutOfRange {
            kind: "chapter",
            index,
        })
    }
}

/// A course needs at least one chapter before lessons can be added.
pub fn check_chapters(course: &Course) -> EditResult<()> {
    if course.chapters.is_empty() {
        return Err(EditError::Required("At least one chapter"));
    }
    Ok(())
}

/// Which chapters have their lesson list expanded. View state only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChapterListView {
    expanded: BTreeSet<usize>,
}

impl ChapterListView {
    pub fn toggle(&mut self, course: &Course, index: usize) -> EditResult<bool> {
        course.chapter(index)?;
        if self.expanded.remove(&index) {
            Ok(false)
        } else {
            self.expanded.insert(index);
            Ok(true)
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }
}
