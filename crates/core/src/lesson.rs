//! Lesson types and completion-input validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::xp::QUIZ_PASS_THRESHOLD;

/// The kind of a lesson, stored as text in `lessons.lesson_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Text,
    Interactive,
    Quiz,
    Practical,
}

impl LessonType {
    pub const ALL: [LessonType; 4] = [
        LessonType::Text,
        LessonType::Interactive,
        LessonType::Quiz,
        LessonType::Practical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Text => "text",
            LessonType::Interactive => "interactive",
            LessonType::Quiz => "quiz",
            LessonType::Practical => "practical",
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LessonType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid lesson type '{s}'. Must be one of: text, interactive, quiz, practical"
                ))
            })
    }
}

/// Validate the score submitted with a lesson completion.
///
/// Scores are percentages in `0..=100` for every lesson type. Quiz lessons
/// additionally require a score at or above the pass mark; a failing quiz
/// is rejected instead of being recorded as a zero-XP completion.
pub fn validate_completion_score(
    lesson_type: LessonType,
    score: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(s) = score {
        if !(0..=100).contains(&s) {
            return Err(CoreError::Validation(format!(
                "Score must be between 0 and 100, got {s}"
            )));
        }
    }

    if lesson_type == LessonType::Quiz {
        match score {
            None => {
                return Err(CoreError::Validation(
                    "Quiz completion requires a score".to_string(),
                ))
            }
            Some(s) if s < QUIZ_PASS_THRESHOLD => {
                return Err(CoreError::Validation(format!(
                    "Quiz score below {QUIZ_PASS_THRESHOLD}%: scored {s}%"
                )))
            }
            Some(_) => {}
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_and_display() {
        for t in LessonType::ALL {
            assert_eq!(t.as_str().parse::<LessonType>().unwrap(), t);
            assert_eq!(t.to_string(), t.as_str());
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_matches!("video".parse::<LessonType>(), Err(CoreError::Validation(_)));
        assert_matches!("Quiz".parse::<LessonType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn failing_quiz_is_rejected() {
        let err = validate_completion_score(LessonType::Quiz, Some(55)).unwrap_err();
        assert!(err.to_string().contains("Quiz score below 70%"));
    }

    #[test]
    fn quiz_without_score_is_rejected() {
        assert_matches!(
            validate_completion_score(LessonType::Quiz, None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn passing_quiz_is_accepted() {
        assert!(validate_completion_score(LessonType::Quiz, Some(70)).is_ok());
        assert!(validate_completion_score(LessonType::Quiz, Some(100)).is_ok());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        assert!(validate_completion_score(LessonType::Text, Some(101)).is_err());
        assert!(validate_completion_score(LessonType::Quiz, Some(-1)).is_err());
    }

    #[test]
    fn non_quiz_needs_no_score() {
        assert!(validate_completion_score(LessonType::Text, None).is_ok());
        assert!(validate_completion_score(LessonType::Practical, Some(10)).is_ok());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&LessonType::Interactive).unwrap();
        assert_eq!(json, "\"interactive\"");
    }
}
