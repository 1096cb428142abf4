//! Course catalog models.

use academy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a course.
#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `beginner` when omitted.
    pub difficulty: Option<String>,
    /// Defaults to `true` when omitted.
    pub is_published: Option<bool>,
}
