//! Repository for the read-only `genres` table.

use sqlx::SqlitePool;

use crate::models::genre::Genre;

pub struct GenreRepo;

impl GenreRepo {
    /// All genres in seed order.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Find a genre by exact name.
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Genre>, sqlx::Error> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
