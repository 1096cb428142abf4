//! Achievement catalog and per-user grants.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub criteria_type: String,
    pub threshold: i64,
    pub xp_reward: i32,
    pub created_at: Timestamp,
}

/// DTO for creating an achievement.
#[derive(Debug, Deserialize)]
pub struct CreateAchievement {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub criteria_type: String,
    pub threshold: i64,
    pub xp_reward: i32,
}

/// An achievement joined with the time the user earned it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EarnedAchievement {
    pub achievement_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub xp_reward: i32,
    pub earned_at: Timestamp,
}
