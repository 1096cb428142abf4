//! Per-(user, course) progress aggregate.

use academy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_progress` table.
///
/// The counters are maintained by the `update_course_progress` trigger;
/// application code only creates the row (enrollment), moves
/// `current_lesson_id` and claims `bonus_awarded_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub lessons_completed: i32,
    pub total_lessons: i32,
    pub progress_percentage: i32,
    pub current_lesson_id: Option<DbId>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    /// Set once the course completion bonus has been paid.
    pub bonus_awarded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProgress {
    /// `lessons_completed >= total_lessons` for a non-empty course.
    pub fn is_course_complete(&self) -> bool {
        academy_core::course::is_course_complete(self.lessons_completed, self.total_lessons)
    }
}
