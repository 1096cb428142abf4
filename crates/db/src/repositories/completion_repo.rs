//! Repository for the `lesson_completions` table.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::completion::{LessonCompletion, NewLessonCompletion};

const COLUMNS: &str = "id, user_id, lesson_id, course_id, completed_at, time_spent_seconds, \
                       score_percentage, attempts, xp_earned";

/// Provides completion lookups and the idempotent insert.
pub struct CompletionRepo;

impl CompletionRepo {
    /// Find the completion for a (user, lesson) pair, if any.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        lesson_id: DbId,
    ) -> Result<Option<LessonCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lesson_completions WHERE user_id = $1 AND lesson_id = $2"
        );
        sqlx::query_as::<_, LessonCompletion>(&query)
            .bind(user_id)
            .bind(lesson_id)
            .fetch_optional(pool)
            .await
    }

    /// Record a completion.
    ///
    /// Returns `None` when a completion for the (user, lesson) pair already
    /// exists: `uq_lesson_completions_user_lesson` makes the second insert a
    /// no-op, which is how concurrent completions are told apart.
    pub async fn insert(
        pool: &PgPool,
        input: &NewLessonCompletion,
    ) -> Result<Option<LessonCompletion>, sqlx::Error> {
        let query = format!(
            "INSERT INTO lesson_completions
                 (user_id, lesson_id, course_id, time_spent_seconds, score_percentage, attempts, xp_earned)
             VALUES ($1, $2, $3, $4, $5, 1, $6)
             ON CONFLICT ON CONSTRAINT uq_lesson_completions_user_lesson DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LessonCompletion>(&query)
            .bind(input.user_id)
            .bind(input.lesson_id)
            .bind(input.course_id)
            .bind(input.time_spent_seconds)
            .bind(input.score_percentage)
            .bind(input.xp_earned)
            .fetch_optional(pool)
            .await
    }

    /// List a user's completions within one course, oldest first.
    pub async fn list_by_user_course(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<LessonCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lesson_completions
             WHERE user_id = $1 AND course_id = $2
             ORDER BY completed_at, id"
        );
        sqlx::query_as::<_, LessonCompletion>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }
}
