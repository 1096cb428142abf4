use axum::routing::get;
use axum::Router;

use crate::handlers::achievements;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// GET    /achievements   -> list_catalog
/// GET    /leaderboard    -> leaderboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/achievements", get(achievements::list_catalog))
        .route("/leaderboard", get(achievements::leaderboard))
}
