//! Handlers for the authenticated learner's own stats and history.

use academy_core::error::CoreError;
use academy_core::xp::LevelProgress;
use academy_db::repositories::{AchievementRepo, ProgressRepo, UserRepo};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// XP, level and activity counters for the profile header.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub username: String,
    #[serde(flatten)]
    pub level: LevelProgress,
    pub lessons_completed: i32,
    pub courses_completed: i32,
}

/// GET /api/v1/user/stats
pub async fn get_stats(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "user",
            id: user.user_id,
        })?;

    Ok(Json(DataResponse {
        data: UserStats {
            username: row.username,
            level: LevelProgress::for_total_xp(row.total_xp),
            lessons_completed: row.lessons_completed,
            courses_completed: row.courses_completed,
        },
    }))
}

/// GET /api/v1/user/progress
///
/// Every course the learner is enrolled in.
pub async fn list_progress(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let progress = ProgressRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/user/achievements
pub async fn list_achievements(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let earned = AchievementRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: earned }))
}
