//! Handlers for the badge catalog and the leaderboard.

use academy_db::repositories::{AchievementRepo, UserRepo};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/achievements
pub async fn list_catalog(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let achievements = AchievementRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: achievements }))
}

/// GET /api/v1/leaderboard?limit=N
///
/// Top learners by total XP. `limit` is clamped to `1..=100`.
pub async fn leaderboard(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);
    let entries = UserRepo::leaderboard(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
