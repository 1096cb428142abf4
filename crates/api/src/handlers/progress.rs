//! Handlers that drive the progress pipeline: lesson completion, course
//! progress and current-lesson tracking.

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::repositories::LessonRepo;
use academy_pipeline::CompletionRequest;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::courses::ensure_course_exists;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Body for POST `/courses/{id}/lessons/{lesson_id}/complete`.
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteLessonRequest {
    /// Percentage score; required for quizzes.
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,
    #[validate(range(min = 0))]
    pub time_spent_seconds: Option<i32>,
}

/// Body for PUT `/courses/{id}/current-lesson`.
#[derive(Debug, Deserialize)]
pub struct CurrentLessonRequest {
    pub lesson_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct CurrentLessonResponse {
    pub updated: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/courses/{id}/lessons/{lesson_id}/complete
///
/// Records the completion and returns the XP, level and badge outcome.
pub async fn complete_lesson(
    user: AuthUser,
    State(state): State<AppState>,
    Path((course_id, lesson_id)): Path<(DbId, DbId)>,
    Json(input): Json<CompleteLessonRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .pipeline
        .mark_lesson_complete(&CompletionRequest {
            user_id: user.user_id,
            lesson_id,
            course_id,
            score: input.score,
            time_spent_seconds: input.time_spent_seconds,
        })
        .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/courses/{id}/progress
///
/// Returns 204 when there is no progress to report, whether because the
/// learner is not enrolled or because it could not be read.
pub async fn get_progress(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match state
        .pipeline
        .get_course_progress(user.user_id, course_id)
        .await
    {
        Some(p) => Ok(Json(DataResponse { data: p }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// PUT /api/v1/courses/{id}/current-lesson
pub async fn set_current_lesson(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
    Json(input): Json<CurrentLessonRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_course_exists(&state, course_id).await?;
    let lesson = LessonRepo::find_by_id(&state.pool, input.lesson_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "lesson",
            id: input.lesson_id,
        })?;
    if lesson.course_id != course_id {
        return Err(CoreError::Validation(format!(
            "Lesson {} does not belong to course {course_id}",
            input.lesson_id
        ))
        .into());
    }

    let updated = state
        .pipeline
        .update_current_lesson(user.user_id, course_id, input.lesson_id)
        .await;

    Ok(Json(DataResponse {
        data: CurrentLessonResponse { updated },
    }))
}
