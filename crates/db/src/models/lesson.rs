//! Lesson models.

use std::str::FromStr;

use academy_core::error::CoreError;
use academy_core::lesson::LessonType;
use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lesson {
    pub id: DbId,
    pub course_id: DbId,
    pub title: String,
    pub lesson_type: String,
    pub sort_order: i32,
    pub content: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lesson {
    /// Parsed `lesson_type`. The column has a CHECK constraint, so this only
    /// fails for rows written outside the migrations' rules.
    pub fn kind(&self) -> Result<LessonType, CoreError> {
        LessonType::from_str(&self.lesson_type)
    }
}

/// DTO for creating a lesson.
#[derive(Debug, Deserialize)]
pub struct CreateLesson {
    pub course_id: DbId,
    pub title: String,
    pub lesson_type: LessonType,
    pub sort_order: i32,
    pub content: Option<serde_json::Value>,
}
