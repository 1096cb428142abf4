use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET    /stats          -> get_stats
/// GET    /progress       -> list_progress
/// GET    /achievements   -> list_achievements
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(user::get_stats))
        .route("/progress", get(user::list_progress))
        .route("/achievements", get(user::list_achievements))
}
