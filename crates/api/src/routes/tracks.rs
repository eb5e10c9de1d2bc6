//! Route definitions for the `/tracks` catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{metrics, playlist, tracks};
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET    /                 -> list_tracks
/// POST   /                 -> upload_track (creator, multipart)
/// GET    /genre/{genre}    -> list_tracks_by_genre
/// GET    /{id}             -> view_track
/// DELETE /{id}             -> delete_track (owner)
/// GET    /{id}/detail      -> track_detail
/// GET    /{id}/audio       -> stream_audio
/// POST   /{id}/like        -> like_track
/// POST   /{id}/dislike     -> dislike_track
/// POST   /{id}/save        -> save_track
/// POST   /{id}/comments    -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tracks::list_tracks).post(tracks::upload_track))
        .route("/genre/{genre}", get(tracks::list_tracks_by_genre))
        .route("/{id}", get(tracks::view_track).delete(tracks::delete_track))
        .route("/{id}/detail", get(tracks::track_detail))
        .route("/{id}/audio", get(tracks::stream_audio))
        .route("/{id}/like", post(metrics::like_track))
        .route("/{id}/dislike", post(metrics::dislike_track))
        .route("/{id}/save", post(playlist::save_track))
        .route("/{id}/comments", post(tracks::add_comment))
}
