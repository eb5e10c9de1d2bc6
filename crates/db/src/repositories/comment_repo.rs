//! Repository for the `comments` table. Comments are insert-only; they are
//! removed together with their track.

use sqlx::SqlitePool;
use soundshelf_core::types::DbId;

use crate::models::comment::{Comment, CommentWithAuthor, CreateComment};

pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &SqlitePool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (date, user_id, track_id, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, date, user_id, track_id, content",
        )
        .bind(input.date)
        .bind(input.user_id)
        .bind(input.track_id)
        .bind(&input.content)
        .fetch_one(pool)
        .await
    }

    /// Comments on a track with their authors' usernames, oldest first.
    pub async fn list_for_track(
        pool: &SqlitePool,
        track_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id AS id, c.date AS date, c.user_id AS user_id, \
                    c.track_id AS track_id, c.content AS content, u.username AS username \
             FROM comments c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.track_id = $1 \
             ORDER BY c.id",
        )
        .bind(track_id)
        .fetch_all(pool)
        .await
    }

    /// Number of comments on a track.
    pub async fn count_for_track(pool: &SqlitePool, track_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE track_id = $1")
            .bind(track_id)
            .fetch_one(pool)
            .await
    }
}
