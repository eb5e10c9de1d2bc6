//! Repository for the `playlists` and `playlist_entries` tables.

use sqlx::SqlitePool;
use soundshelf_core::playlist::{SaveOutcome, DEFAULT_PLAYLIST_NAME};
use soundshelf_core::types::DbId;

use crate::models::playlist::Playlist;
use crate::models::track::TrackWithCreator;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, user_id, is_default";

pub struct PlaylistRepo;

impl PlaylistRepo {
    /// The user's first playlist, preferring the default one.
    pub async fn find_first_for_user(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Option<Playlist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM playlists WHERE user_id = $1 \
             ORDER BY is_default DESC, id LIMIT 1"
        );
        sqlx::query_as::<_, Playlist>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's first playlist, creating the default one if the user
    /// has none.
    ///
    /// The insert is a no-op when another request created the default
    /// playlist first (partial unique index on `user_id`), so concurrent
    /// callers all end up with the same row.
    pub async fn get_or_create_default(
        pool: &SqlitePool,
        user_id: DbId,
    ) -> Result<Playlist, sqlx::Error> {
        if let Some(playlist) = Self::find_first_for_user(pool, user_id).await? {
            return Ok(playlist);
        }

        let inserted = sqlx::query(
            "INSERT INTO playlists (name, user_id, is_default) VALUES ($1, $2, 1) \
             ON CONFLICT DO NOTHING",
        )
        .bind(DEFAULT_PLAYLIST_NAME)
        .bind(user_id)
        .execute(pool)
        .await?;
        if inserted.rows_affected() > 0 {
            tracing::debug!(user_id, "Created default playlist");
        }

        Self::find_first_for_user(pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Add a track to a playlist unless it is already there.
    pub async fn add_track(
        pool: &SqlitePool,
        playlist_id: DbId,
        track_id: DbId,
    ) -> Result<SaveOutcome, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO playlist_entries (playlist_id, track_id) VALUES ($1, $2) \
             ON CONFLICT (playlist_id, track_id) DO NOTHING",
        )
        .bind(playlist_id)
        .bind(track_id)
        .execute(pool)
        .await?;
        Ok(SaveOutcome::from_rows_affected(result.rows_affected()))
    }

    /// Tracks in a playlist with creator usernames, in the order they were added.
    pub async fn list_tracks(
        pool: &SqlitePool,
        playlist_id: DbId,
    ) -> Result<Vec<TrackWithCreator>, sqlx::Error> {
        sqlx::query_as::<_, TrackWithCreator>(
            "SELECT t.id AS id, t.title AS title, t.creator_id AS creator_id, \
                    t.cover_image_file AS cover_image_file, t.upload_date AS upload_date, \
                    t.genre_id AS genre_id, t.shareable AS shareable, t.premium AS premium, \
                    u.username AS creator_username \
             FROM playlist_entries pe \
             JOIN tracks t ON t.id = pe.track_id \
             JOIN users u ON u.id = t.creator_id \
             WHERE pe.playlist_id = $1 \
             ORDER BY pe.id",
        )
        .bind(playlist_id)
        .fetch_all(pool)
        .await
    }

    /// Number of entries in a playlist.
    pub async fn count_entries(pool: &SqlitePool, playlist_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM playlist_entries WHERE playlist_id = $1")
            .bind(playlist_id)
            .fetch_one(pool)
            .await
    }
}
