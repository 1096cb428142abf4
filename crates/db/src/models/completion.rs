//! Lesson completion models.

use academy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lesson_completions` table. Written once, never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LessonCompletion {
    pub id: DbId,
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub course_id: DbId,
    pub completed_at: Timestamp,
    pub time_spent_seconds: i32,
    pub score_percentage: Option<i32>,
    pub attempts: i32,
    pub xp_earned: i32,
}

/// Input for recording a completion.
#[derive(Debug, Clone)]
pub struct NewLessonCompletion {
    pub user_id: DbId,
    pub lesson_id: DbId,
    pub course_id: DbId,
    pub time_spent_seconds: i32,
    pub score_percentage: Option<i32>,
    pub xp_earned: i32,
}
