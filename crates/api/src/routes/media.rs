use axum::routing::get;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Stored uploads, mounted at the root (not under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/media/{*key}", get(media::serve_media))
}
