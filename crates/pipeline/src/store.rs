//! The storage seam of the pipeline.

use academy_core::types::DbId;
use academy_db::models::completion::{LessonCompletion, NewLessonCompletion};
use academy_db::models::lesson::Lesson;
use academy_db::models::progress::UserProgress;
use academy_db::models::user::{User, XpTotals};
use async_trait::async_trait;

use crate::error::StoreError;

/// Every remote operation the progress pipeline performs.
///
/// Each call is an independent round-trip; nothing here is transactional
/// across calls.
#[async_trait]
pub trait LearningStore: Send + Sync {
    async fn find_completion(
        &self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonCompletion>, StoreError>;

    async fn find_lesson(&self, lesson_id: DbId) -> Result<Option<Lesson>, StoreError>;

    /// Insert a completion; `None` means the (user, lesson) pair already has
    /// one.
    async fn insert_completion(
        &self,
        input: &NewLessonCompletion,
    ) -> Result<Option<LessonCompletion>, StoreError>;

    async fn increment_lessons_completed(&self, user_id: DbId) -> Result<(), StoreError>;

    async fn increment_courses_completed(&self, user_id: DbId) -> Result<(), StoreError>;

    async fn find_user(&self, user_id: DbId) -> Result<Option<User>, StoreError>;

    /// Add XP and recompute the level in one remote call. `None` if the user
    /// does not exist.
    async fn award_xp(&self, user_id: DbId, amount: i32) -> Result<Option<XpTotals>, StoreError>;

    /// Write XP totals only if the stored total still equals `expected_total_xp`.
    async fn set_xp_if_unchanged(
        &self,
        user_id: DbId,
        expected_total_xp: i64,
        totals: XpTotals,
    ) -> Result<bool, StoreError>;

    async fn find_progress(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<UserProgress>, StoreError>;

    /// Mark the completion bonus of a finished course as paid. `true` only
    /// for the single call that flips it; `false` if the course is not
    /// finished or the bonus was already claimed.
    async fn claim_course_bonus(&self, user_id: DbId, course_id: DbId)
        -> Result<bool, StoreError>;

    /// Move the current-lesson pointer; `false` if there is no enrollment.
    async fn set_current_lesson(
        &self,
        user_id: DbId,
        course_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, StoreError>;
}
