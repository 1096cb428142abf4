//! Handlers for the course catalog and enrollment.

use academy_core::error::CoreError;
use academy_core::types::DbId;
use academy_db::models::course::Course;
use academy_db::models::lesson::Lesson;
use academy_db::repositories::{CourseRepo, LessonRepo, ProgressRepo};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A course with its lessons in display order.
#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
}

/// Load a course or fail with 404.
pub(crate) async fn ensure_course_exists(state: &AppState, course_id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(&state.pool, course_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "course",
            id: course_id,
        }))
}

/// GET /api/v1/courses
pub async fn list_courses(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let courses = CourseRepo::list_published(&state.pool).await?;
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/{id}
pub async fn get_course(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let course = ensure_course_exists(&state, course_id).await?;
    let lessons = LessonRepo::list_by_course(&state.pool, course_id).await?;

    Ok(Json(DataResponse {
        data: CourseDetail { course, lessons },
    }))
}

/// POST /api/v1/courses/{id}/enroll
///
/// Creates the learner's progress row. Enrolling again returns the
/// existing row.
pub async fn enroll(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_course_exists(&state, course_id).await?;
    let progress = ProgressRepo::enroll(&state.pool, user.user_id, course_id).await?;

    tracing::info!(user_id = user.user_id, course_id, "User enrolled in course");

    Ok((StatusCode::CREATED, Json(DataResponse { data: progress })))
}
