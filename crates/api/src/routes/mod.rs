pub mod achievements;
pub mod courses;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /courses                                       published catalog
/// /courses/{id}                                  course with lessons
/// /courses/{id}/enroll                           enroll (POST)
/// /courses/{id}/progress                         course progress (204 when none)
/// /courses/{id}/current-lesson                   track current lesson (PUT)
/// /courses/{id}/lessons/{lesson_id}/complete     complete a lesson (POST)
///
/// /user/stats                                    XP, level, counters
/// /user/progress                                 all enrollments
/// /user/achievements                             earned badges
///
/// /achievements                                  badge catalog
/// /leaderboard                                   top learners by XP
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/courses", courses::router())
        .nest("/user", user::router())
        .merge(achievements::router())
}
