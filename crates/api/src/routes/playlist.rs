use axum::routing::get;
use axum::Router;

use crate::handlers::playlist;
use crate::state::AppState;

/// Routes mounted at `/playlist`. Saving lives under `/tracks/{id}/save`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(playlist::view_playlist))
}
