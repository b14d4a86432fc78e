//! Course basic info: scalar fields, the feature list and the step gate.

use serde::{Deserialize, Serialize};

use crate::domain::{Course, MAX_DESCRIPTION_CHARS, MAX_DURATION_MONTHS, MIN_DURATION_MONTHS};
use crate::error::{EditError, EditResult};

/// One scalar field of the course together with its new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum CourseField {
    Name(String),
    Instructor(String),
    Description(String),
    /// Months. Clamped into the allowed range.
    Duration(i64),
    /// Negative or non-finite prices become zero.
    Price(f64),
}

impl Course {
    /// Updates a single field, normalising the value instead of rejecting it.
    pub fn set_field(&mut self, field: CourseField) {
        match field {
            CourseField::Name(name) => self.name = name,
            CourseField::Instructor(instructor) => self.instructor = instructor,
            CourseField::Description(description) => {
                self.description = truncate_chars(description, MAX_DESCRIPTION_CHARS)
            }
            CourseField::Duration(months) => self.duration = clamp_duration(months),
            CourseField::Price(price) => self.price = coerce_price(price),
        }
    }

    /// Appends a feature tag. Matching is exact and case-sensitive.
    pub fn add_feature(&mut self, text: &str) -> EditResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EditError::EmptyFeature);
        }
        if self.features.iter().any(|f| f == text) {
            return Err(EditError::DuplicateFeature(text.to_string()));
        }
        self.features.push(text.to_string());
        Ok(())
    }

    pub fn remove_feature(&mut self, index: usize) -> EditResult<String> {
        if index >= self.features.len() {
            return Err(EditError::OutOfRange {
                kind: "feature",
                index,
            });
        }
        Ok(self.features.remove(index))
    }

    pub fn set_banner(&mut self, url: impl Into<String>) {
        self.banner = url.into().trim().to_string();
    }
}

/// The fields that must be filled in before leaving the basic info step.
pub fn check_basic_info(course: &Course) -> EditResult<()> {
    if course.name.trim().is_empty() {
        return Err(EditError::Required("Course name"));
    }
    if course.instructor.trim().is_empty() {
        return Err(EditError::Required("Instructor"));
    }
    if course.description.trim().is_empty() {
        return Err(EditError::Required("Description"));
    }
    Ok(())
}

fn truncate_chars(text: String, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}

fn clamp_duration(months: i64) -> u8 {
    months.clamp(MIN_DURATION_MONTHS as i64, MAX_DURATION_MONTHS as i64) as u8
}

fn coerce_price(price: f64) -> f64 {
    if price.is_finite() && price > 0.0 {
        price
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn duration_is_clamped() {
        let mut course = Course::default();
        course.set_field(CourseField::Duration(0));
        assert_eq!(course.duration, 1);
        course.set_field(CourseField::Duration(40));
        assert_eq!(course.duration, 12);
        course.set_field(CourseField::Duration(6));
        assert_eq!(course.duration, 6);
    }

    #[test]
    fn price_is_never_negative() {
        let mut course = Course::default();
        course.set_field(CourseField::Price(-10.0));
        assert_eq!(course.price, 0.0);
        course.set_field(CourseField::Price(f64::NAN));
        assert_eq!(course.price, 0.0);
        course.set_field(CourseField::Price(49.99));
        assert_eq!(course.price, 49.99);
    }

    #[test]
    fn description_is_truncated_on_char_boundary() {
        let mut course = Course::default();
        course.set_field(CourseField::Description("é".repeat(600)));
        assert_eq!(course.description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn duplicate_and_empty_features_are_refused() {
        let mut course = Course::default();
        course.add_feature("Live sessions").unwrap();
        assert_eq!(
            course.add_feature("Live sessions"),
            Err(EditError::DuplicateFeature("Live sessions".to_string()))
        );
        assert_eq!(course.add_feature("   "), Err(EditError::EmptyFeature));
        course.add_feature("live sessions").unwrap();
        assert_eq!(course.features.len(), 2);
    }

    #[test]
    fn remove_feature_out_of_range() {
        let mut course = Course::default();
        assert!(course.remove_feature(0).is_err());
        course.add_feature("Signals").unwrap();
        assert_eq!(course.remove_feature(0).unwrap(), "Signals");
        assert!(course.features.is_empty());
    }

    #[test]
    fn gate_reports_first_missing_field() {
        let mut course = Course::default();
        assert_eq!(check_basic_info(&course), Err(EditError::Required("Course name")));
        course.set_field(CourseField::Name("Options 101".to_string()));
        course.set_field(CourseField::Instructor("R. Patel".to_string()));
        assert_eq!(check_basic_info(&course), Err(EditError::Required("Description")));
        course.set_field(CourseField::Description("Basics".to_string()));
        assert_eq!(check_basic_info(&course), Ok(()));
    }

    #[test]
    fn course_field_json_shape() {
        let field: CourseField =
            serde_json::from_str(r#"{"field":"duration","value":3}"#).unwrap();
        assert_eq!(field, CourseField::Duration(3));
    }

    proptest! {
        #[test]
        fn features_stay_unique_and_non_empty(inputs in proptest::collection::vec("[ab ]{0,3}", 0..30)) {
            let mut course = Course::default();
            for text in &inputs {
                let _ = course.add_feature(text);
            }
            let mut seen = std::collections::HashSet::new();
            for feature in &course.features {
                prop_assert!(!feature.is_empty());
                prop_assert!(seen.insert(feature.clone()));
            }
        }
    }
}
