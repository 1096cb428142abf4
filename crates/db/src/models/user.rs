//! User entity model and DTOs.

use academy_core::badges::UserCounters;
use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// `total_xp`, `current_level`, `lessons_completed` and `courses_completed`
/// are only changed through the XP-award and counter-increment paths.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub total_xp: i64,
    pub current_level: i32,
    pub lessons_completed: i32,
    pub courses_completed: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn counters(&self) -> UserCounters {
        UserCounters {
            lessons_completed: self.lessons_completed,
            courses_completed: self.courses_completed,
            total_xp: self.total_xp,
            current_level: self.current_level,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
}

/// XP total and level after an award, as returned by `award_xp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
pub struct XpTotals {
    pub total_xp: i64,
    pub current_level: i32,
}

/// One row of the XP leaderboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: DbId,
    pub username: String,
    pub total_xp: i64,
    pub current_level: i32,
}
