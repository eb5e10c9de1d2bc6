//! Playlist and playlist entry models.

use serde::Serialize;
use sqlx::FromRow;
use soundshelf_core::types::DbId;

/// A row from the `playlists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Playlist {
    pub id: DbId,
    pub name: String,
    pub user_id: DbId,
    pub is_default: bool,
}

/// A row from the `playlist_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaylistEntry {
    pub id: DbId,
    pub playlist_id: DbId,
    pub track_id: DbId,
}
