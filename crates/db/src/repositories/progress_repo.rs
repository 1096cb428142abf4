//! Repository for the `user_progress` table.
//!
//! The counters on this table belong to the `update_course_progress`
//! trigger. This repository only enrolls users, reads the aggregate,
//! moves the current-lesson pointer and claims the completion bonus.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::UserProgress;

const COLUMNS: &str = "id, user_id, course_id, lessons_completed, total_lessons, \
                       progress_percentage, current_lesson_id, started_at, completed_at, \
                       bonus_awarded_at, created_at, updated_at";

/// Provides enrollment and progress reads.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Enroll a user in a course, creating the progress row with the
    /// course's current lesson count. Enrolling twice returns the existing
    /// row unchanged.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<UserProgress, sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_progress (user_id, course_id, total_lessons)
             VALUES ($1, $2, (SELECT COUNT(*) FROM lessons WHERE course_id = $2))
             ON CONFLICT ON CONSTRAINT uq_user_progress_user_course DO NOTHING",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;

        Self::find(pool, user_id, course_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Read the progress aggregate for a (user, course) pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<UserProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_progress WHERE user_id = $1 AND course_id = $2"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Point the enrollment at `lesson_id`, stamping `started_at` only if it
    /// was never set.
    ///
    /// Returns `false` if the user is not enrolled.
    pub async fn set_current_lesson(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
        lesson_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_progress SET
                 current_lesson_id = $3,
                 started_at = COALESCE(started_at, now())
             WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(lesson_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `bonus_awarded_at` on a finished course that has not paid its
    /// completion bonus yet.
    ///
    /// Returns `true` for exactly one caller per (user, course).
    pub async fn claim_completion_bonus(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_progress SET bonus_awarded_at = now()
             WHERE user_id = $1 AND course_id = $2
               AND completed_at IS NOT NULL
               AND bonus_awarded_at IS NULL",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List every enrollment of a user, most recently touched first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserProgress>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_progress WHERE user_id = $1 ORDER BY updated_at DESC, id"
        );
        sqlx::query_as::<_, UserProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
