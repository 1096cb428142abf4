//! Repository for the `achievements` and `user_achievements` tables.

use academy_core::types::DbId;
use sqlx::PgPool;

use crate::models::achievement::{Achievement, CreateAchievement, EarnedAchievement};

const COLUMNS: &str =
    "id, code, name, description, criteria_type, threshold, xp_reward, created_at";

/// Provides the badge catalog and per-user grants.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Insert a new achievement, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAchievement,
    ) -> Result<Achievement, sqlx::Error> {
        let query = format!(
            "INSERT INTO achievements (code, name, description, criteria_type, threshold, xp_reward)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.criteria_type)
            .bind(input.threshold)
            .bind(input.xp_reward)
            .fetch_one(pool)
            .await
    }

    /// List the whole catalog ordered by criteria then threshold.
    pub async fn list(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM achievements ORDER BY criteria_type, threshold, id");
        sqlx::query_as::<_, Achievement>(&query).fetch_all(pool).await
    }

    /// Achievements the user has not earned yet.
    pub async fn list_unearned(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Achievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM achievements a
             WHERE NOT EXISTS (
                 SELECT 1 FROM user_achievements ua
                 WHERE ua.achievement_id = a.id AND ua.user_id = $1
             )
             ORDER BY a.id"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Achievements the user has earned, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<EarnedAchievement>, sqlx::Error> {
        sqlx::query_as::<_, EarnedAchievement>(
            "SELECT a.id AS achievement_id, a.code, a.name, a.description, a.xp_reward, ua.earned_at
             FROM user_achievements ua
             JOIN achievements a ON a.id = ua.achievement_id
             WHERE ua.user_id = $1
             ORDER BY ua.earned_at DESC, a.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Grant an achievement. Returns `false` if the user already had it.
    pub async fn grant(
        pool: &PgPool,
        user_id: DbId,
        achievement_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_achievements (user_id, achievement_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_user_achievements_user_achievement DO NOTHING",
        )
        .bind(user_id)
        .bind(achievement_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
