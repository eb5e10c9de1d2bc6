//! Handlers for the caller's default playlist.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use soundshelf_core::playlist::SaveOutcome;
use soundshelf_core::types::DbId;
use soundshelf_db::models::playlist::Playlist;
use soundshelf_db::models::track::TrackWithCreator;
use soundshelf_db::repositories::PlaylistRepo;

use super::tracks::find_track;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub playlist_id: DbId,
    pub track_id: DbId,
    pub outcome: SaveOutcome,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    #[serde(flatten)]
    pub playlist: Playlist,
    pub tracks: Vec<TrackWithCreator>,
}

/// POST /api/v1/tracks/{id}/save
///
/// Add a track to the caller's playlist, creating the playlist on first
/// use. Saving a track twice is not an error; the outcome says which
/// happened.
pub async fn save_track(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SaveResponse>>> {
    find_track(&state, id).await?;

    let playlist = PlaylistRepo::get_or_create_default(&state.pool, auth_user.user_id).await?;
    let outcome = PlaylistRepo::add_track(&state.pool, playlist.id, id).await?;

    tracing::info!(
        user_id = auth_user.user_id,
        playlist_id = playlist.id,
        track_id = id,
        ?outcome,
        "Save to playlist"
    );

    Ok(Json(DataResponse {
        data: SaveResponse {
            playlist_id: playlist.id,
            track_id: id,
            outcome,
            message: outcome.message(),
        },
    }))
}

/// GET /api/v1/playlist
pub async fn view_playlist(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<PlaylistResponse>>> {
    let playlist = PlaylistRepo::get_or_create_default(&state.pool, auth_user.user_id).await?;
    let tracks = PlaylistRepo::list_tracks(&state.pool, playlist.id).await?;
    Ok(Json(DataResponse {
        data: PlaylistResponse { playlist, tracks },
    }))
}
