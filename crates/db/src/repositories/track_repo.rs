//! Repository for the `tracks` table.

use sqlx::{SqliteExecutor, SqlitePool};
use soundshelf_core::media::DEFAULT_COVER_FILE;
use soundshelf_core::types::DbId;

use crate::models::track::{CreateTrack, Track, TrackWithCreator};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, creator_id, cover_image_file, upload_date, genre_id, shareable, premium";

/// Column list for `tracks t JOIN users u` queries.
const JOINED_COLUMNS: &str = "t.id AS id, t.title AS title, t.creator_id AS creator_id, \
     t.cover_image_file AS cover_image_file, t.upload_date AS upload_date, \
     t.genre_id AS genre_id, t.shareable AS shareable, t.premium AS premium, \
     u.username AS creator_username";

/// Provides CRUD and listing operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row with its assigned id.
    ///
    /// Accepts any executor so the upload handler can run it inside the
    /// transaction that also stores the audio file.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &CreateTrack,
    ) -> Result<Track, sqlx::Error> {
        let query = format!(
            "INSERT INTO tracks \
                (title, creator_id, cover_image_file, upload_date, genre_id, shareable, premium) \
             VALUES ($1, $2, COALESCE($3, '{DEFAULT_COVER_FILE}'), $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(&input.title)
            .bind(input.creator_id)
            .bind(&input.cover_image_file)
            .bind(input.upload_date)
            .bind(input.genre_id)
            .bind(input.shareable)
            .bind(input.premium)
            .fetch_one(executor)
            .await
    }

    /// Find a track by its internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a track joined with its creator's username.
    pub async fn find_with_creator(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<TrackWithCreator>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM tracks t \
             JOIN users u ON u.id = t.creator_id \
             WHERE t.id = $1"
        );
        sqlx::query_as::<_, TrackWithCreator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a track with exactly this title exists.
    pub async fn title_exists(pool: &SqlitePool, title: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM tracks WHERE title = $1)")
            .bind(title)
            .fetch_one(pool)
            .await
    }

    /// Count tracks, optionally restricted to one genre.
    pub async fn count(pool: &SqlitePool, genre_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tracks WHERE ($1 IS NULL OR genre_id = $1)",
        )
        .bind(genre_id)
        .fetch_one(pool)
        .await
    }

    /// One page of tracks with creator usernames, newest upload first.
    ///
    /// Ties on upload date are broken by id, newest first.
    pub async fn list_page(
        pool: &SqlitePool,
        genre_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TrackWithCreator>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM tracks t \
             JOIN users u ON u.id = t.creator_id \
             WHERE ($1 IS NULL OR t.genre_id = $1) \
             ORDER BY t.upload_date DESC, t.id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, TrackWithCreator>(&query)
            .bind(genre_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a track together with its comments, playlist entries and
    /// metrics row in one transaction.
    ///
    /// Returns `false` if no track with the given `id` exists.
    pub async fn delete_with_dependents(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for table in ["comments", "playlist_entries", "track_metrics"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE track_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM tracks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
