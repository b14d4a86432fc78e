//! Quiz question editing. Every method here preserves
//! `correct_answer < options.len()`.

use crate::domain::QuizQuestion;
use crate::error::{EditError, EditResult};

impl QuizQuestion {
    /// Builds a question from complete parts, refusing anything that could not
    /// be appended to a lesson.
    pub fn from_parts(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> EditResult<Self> {
        let quiz = Self {
            question: question.into().trim().to_string(),
            options: options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_answer,
        };
        quiz.validate()?;
        Ok(quiz)
    }

    pub fn set_question(&mut self, text: impl Into<String>) {
        self.question = text.into();
    }

    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> EditResult<()> {
        let slot = self.options.get_mut(index).ok_or(EditError::OutOfRange {
            kind: "quiz option",
            index,
        })?;
        *slot = text.into();
        Ok(())
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Removes one option. When the removed option sits at or before the
    /// correct answer, the answer moves down one place (never below zero).
    pub fn remove_option(&mut self, index: usize) -> EditResult<()> {
        if index >= self.options.len() {
            return Err(EditError::OutOfRange {
                kind: "quiz option",
                index,
            });
        }
        if self.options.len() == 1 {
            return Err(EditError::LastQuizOption);
        }
        self.options.remove(index);
        if index <= self.correct_answer {
            self.correct_answer = self.correct_answer.saturating_sub(1);
        }
        // Clamp an answer that was already out of range.
        self.correct_answer = self.correct_answer.min(self.options.len() - 1);
        Ok(())
    }

    pub fn set_correct_answer(&mut self, index: usize) -> EditResult<()> {
        if index >= self.options.len() {
            return Err(EditError::AnswerOutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.correct_answer = index;
        Ok(())
    }

    /// Checks that the question can be appended to a lesson's quiz.
    pub fn validate(&self) -> EditResult<()> {
        if self.question.trim().is_empty() {
            return Err(EditError::Required("Question"));
        }
        if self.options.is_empty() {
            return Err(EditError::LastQuizOption);
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(EditError::EmptyQuizOption);
        }
        if self.correct_answer >= self.options.len() {
            return Err(EditError::AnswerOutOfRange {
                index: self.correct_answer,
                len: self.options.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn abcd(correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: "Q1?".to_string(),
            options: ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect(),
            correct_answer: correct,
        }
    }

    #[test]
    fn removing_first_option_keeps_answer_zero() {
        let mut quiz = abcd(0);
        quiz.remove_option(0).unwrap();
        assert_eq!(quiz.correct_answer, 0);
        assert_eq!(quiz.options.len(), 3);
    }

    #[test]
    fn removing_before_answer_shifts_it_down() {
        let mut quiz = abcd(3);
        quiz.remove_option(1).unwrap();
        assert_eq!(quiz.correct_answer, 2);
        assert_eq!(quiz.options[quiz.correct_answer], "D");
    }

    #[test]
    fn removing_after_answer_leaves_it() {
        let mut quiz = abcd(1);
        quiz.remove_option(2).unwrap();
        assert_eq!(quiz.correct_answer, 1);
        assert_eq!(quiz.options, vec!["A", "B", "D"]);
    }

    #[test]
    fn out_of_range_answer_is_clamped_on_removal() {
        let mut quiz = abcd(9);
        quiz.remove_option(3).unwrap();
        assert_eq!(quiz.options.len(), 3);
        assert_eq!(quiz.correct_answer, 2);
    }

    #[test]
    fn last_option_cannot_be_removed() {
        let mut quiz = QuizQuestion {
            question: "Q".to_string(),
            options: vec!["only".to_string()],
            correct_answer: 0,
        };
        assert_eq!(quiz.remove_option(0), Err(EditError::LastQuizOption));
        assert_eq!(quiz.options.len(), 1);
    }

    #[test]
    fn from_parts_rejects_blank_option() {
        let options = vec!["A".to_string(), " ".to_string(), "C".to_string(), "D".to_string()];
        assert_eq!(
            QuizQuestion::from_parts("Q1?", options, 0),
            Err(EditError::EmptyQuizOption)
        );
    }

    #[test]
    fn from_parts_rejects_out_of_range_answer() {
        let options = vec!["A".to_string(), "B".to_string()];
        assert_eq!(
            QuizQuestion::from_parts("Q1?", options, 2),
            Err(EditError::AnswerOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn set_correct_answer_is_bounds_checked() {
        let mut quiz = abcd(0);
        assert!(quiz.set_correct_answer(4).is_err());
        assert_eq!(quiz.correct_answer, 0);
        quiz.set_correct_answer(3).unwrap();
        assert_eq!(quiz.correct_answer, 3);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
        Answer(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Answer),
        ]
    }

    proptest! {
        #[test]
        fn answer_index_never_dangles(start in 0usize..4, ops in proptest::collection::vec(op(), 0..40)) {
            let mut quiz = abcd(start);
            for op in ops {
                let _ = match op {
                    Op::Add => {
                        quiz.add_option();
                        Ok(())
                    }
                    Op::Remove(i) => quiz.remove_option(i),
                    Op::Answer(i) => quiz.set_correct_answer(i),
                };
                prop_assert!(!quiz.options.is_empty());
                prop_assert!(quiz.correct_answer < quiz.options.len());
            }
        }
    }
}
