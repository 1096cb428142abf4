//! [`LearningStore`] backed by the PostgreSQL repositories.

use academy_core::types::DbId;
use academy_db::models::completion::{LessonCompletion, NewLessonCompletion};
use academy_db::models::lesson::Lesson;
use academy_db::models::progress::UserProgress;
use academy_db::models::user::{User, XpTotals};
use academy_db::repositories::{CompletionRepo, LessonRepo, ProgressRepo, UserRepo};
use academy_db::DbPool;
use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::LearningStore;

/// PostgreSQL implementation of [`LearningStore`].
#[derive(Clone)]
pub struct PgLearningStore {
    pool: DbPool,
}

impl PgLearningStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LearningStore for PgLearningStore {
    async fn find_completion(
        &self,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonCompletion>, StoreError> {
        Ok(CompletionRepo::find(&self.pool, user_id, lesson_id).await?)
    }

    async fn find_lesson(&self, lesson_id: DbId) -> Result<Option<Lesson>, StoreError> {
        Ok(LessonRepo::find_by_id(&self.pool, lesson_id).await?)
    }

    async fn insert_completion(
        &self,
        input: &NewLessonCompletion,
    ) -> Result<Option<LessonCompletion>, StoreError> {
        Ok(CompletionRepo::insert(&self.pool, input).await?)
    }

    async fn increment_lessons_completed(&self, user_id: DbId) -> Result<(), StoreError> {
        Ok(UserRepo::increment_lessons_completed(&self.pool, user_id).await?)
    }

    async fn increment_courses_completed(&self, user_id: DbId) -> Result<(), StoreError> {
        Ok(UserRepo::increment_courses_completed(&self.pool, user_id).await?)
    }

    async fn find_user(&self, user_id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, user_id).await?)
    }

    async fn award_xp(&self, user_id: DbId, amount: i32) -> Result<Option<XpTotals>, StoreError> {
        Ok(UserRepo::award_xp(&self.pool, user_id, amount).await?)
    }

    async fn set_xp_if_unchanged(
        &self,
        user_id: DbId,
        expected_total_xp: i64,
        totals: XpTotals,
    ) -> Result<bool, StoreError> {
        Ok(UserRepo::set_xp_if_unchanged(&self.pool, user_id, expected_total_xp, totals).await?)
    }

    async fn find_progress(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<UserProgress>, StoreError> {
        Ok(ProgressRepo::find(&self.pool, user_id, course_id).await?)
    }

    async fn claim_course_bonus(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, StoreError> {
        Ok(ProgressRepo::claim_completion_bonus(&self.pool, user_id, course_id).await?)
    }

    async fn set_current_lesson(
        &self,
        user_id: DbId,
        course_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, StoreError> {
        Ok(ProgressRepo::set_current_lesson(&self.pool, user_id, course_id, lesson_id).await?)
    }
}
