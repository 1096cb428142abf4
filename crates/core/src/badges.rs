//! Achievement criteria.
//!
//! Each row in `achievements` names a `criteria_type` and a `threshold`.
//! This module decides whether a user's counters satisfy one.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

pub const CRITERIA_LESSONS_COMPLETED: &str = "lessons_completed";
pub const CRITERIA_COURSES_COMPLETED: &str = "courses_completed";
pub const CRITERIA_TOTAL_XP: &str = "total_xp";
pub const CRITERIA_LEVEL: &str = "level";

/// The counter an achievement is unlocked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCriteria {
    LessonsCompleted,
    CoursesCompleted,
    TotalXp,
    Level,
}

impl FromStr for BadgeCriteria {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CRITERIA_LESSONS_COMPLETED => Ok(Self::LessonsCompleted),
            CRITERIA_COURSES_COMPLETED => Ok(Self::CoursesCompleted),
            CRITERIA_TOTAL_XP => Ok(Self::TotalXp),
            CRITERIA_LEVEL => Ok(Self::Level),
            other => Err(CoreError::Validation(format!(
                "Unknown achievement criteria '{other}'"
            ))),
        }
    }
}

/// Snapshot of the user counters achievements are evaluated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCounters {
    pub lessons_completed: i32,
    pub courses_completed: i32,
    pub total_xp: i64,
    pub current_level: i32,
}

impl BadgeCriteria {
    pub fn is_met(self, threshold: i64, counters: &UserCounters) -> bool {
        let value = match self {
            Self::LessonsCompleted => counters.lessons_completed as i64,
            Self::CoursesCompleted => counters.courses_completed as i64,
            Self::TotalXp => counters.total_xp,
            Self::Level => counters.current_level as i64,
        };
        value >= threshold
    }
}
