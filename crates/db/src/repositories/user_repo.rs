//! Repository for the `users` table and the XP procedures that mutate it.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, LeaderboardEntry, User, XpTotals};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, total_xp, current_level, lessons_completed, \
                       courses_completed, created_at, updated_at";

/// Provides user lookups and the XP/counter mutations.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with zeroed counters, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Add XP through the `award_xp` database function, which also
    /// recomputes the level.
    ///
    /// Returns `None` if the user does not exist.
    pub async fn award_xp(
        pool: &PgPool,
        user_id: DbId,
        xp_amount: i32,
    ) -> Result<Option<XpTotals>, sqlx::Error> {
        sqlx::query_as::<_, XpTotals>("SELECT total_xp, current_level FROM award_xp($1, $2)")
            .bind(user_id)
            .bind(xp_amount)
            .fetch_optional(pool)
            .await
    }

    /// Bump `lessons_completed` through the `increment_lessons_completed`
    /// database function.
    pub async fn increment_lessons_completed(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT increment_lessons_completed($1)")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Bump `courses_completed` by one.
    pub async fn increment_courses_completed(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET courses_completed = courses_completed + 1 WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Write an XP total and level directly, but only if `total_xp` still
    /// equals `expected_total_xp`.
    ///
    /// This is the fallback when `award_xp` failed. Returns `false` when
    /// another writer changed the total in between (nothing is written).
    pub async fn set_xp_if_unchanged(
        pool: &PgPool,
        user_id: DbId,
        expected_total_xp: i64,
        totals: XpTotals,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET total_xp = $3, current_level = $4
             WHERE id = $1 AND total_xp = $2",
        )
        .bind(user_id)
        .bind(expected_total_xp)
        .bind(totals.total_xp)
        .bind(totals.current_level)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Top users by XP, ties broken by earliest sign-up.
    pub async fn leaderboard(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT id AS user_id, username, total_xp, current_level
             FROM users
             ORDER BY total_xp DESC, created_at ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
