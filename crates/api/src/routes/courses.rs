//! Course catalog, enrollment and lesson progress routes.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{courses, progress};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /                                  -> list_courses
/// GET    /{id}                              -> get_course
/// POST   /{id}/enroll                       -> enroll
/// GET    /{id}/progress                     -> get_progress
/// PUT    /{id}/current-lesson               -> set_current_lesson
/// POST   /{id}/lessons/{lesson_id}/complete -> complete_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses))
        .route("/{id}", get(courses::get_course))
        .route("/{id}/enroll", post(courses::enroll))
        .route("/{id}/progress", get(progress::get_progress))
        .route("/{id}/current-lesson", put(progress::set_current_lesson))
        .route(
            "/{id}/lessons/{lesson_id}/complete",
            post(progress::complete_lesson),
        )
}
