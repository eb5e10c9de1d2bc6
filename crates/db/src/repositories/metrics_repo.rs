//! Repository for the `track_metrics` table.
//!
//! Every write is a single `INSERT ... ON CONFLICT (track_id)` upsert, so the
//! row is created on first touch and concurrent callers never race to insert
//! a duplicate.

use sqlx::{SqliteExecutor, SqlitePool};
use soundshelf_core::metrics::Counter;
use soundshelf_core::types::DbId;

use crate::models::metrics::TrackMetrics;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "track_id, like_count, dislike_count, view_count";

pub struct MetricsRepo;

impl MetricsRepo {
    /// Fetch the metrics row for a track, creating a zeroed one if absent.
    pub async fn ensure<'e>(
        executor: impl SqliteExecutor<'e>,
        track_id: DbId,
    ) -> Result<TrackMetrics, sqlx::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            "INSERT INTO track_metrics (track_id) VALUES ($1) \
             ON CONFLICT (track_id) DO UPDATE SET track_id = excluded.track_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackMetrics>(&query)
            .bind(track_id)
            .fetch_one(executor)
            .await
    }

    /// Increment one counter by 1, creating the row if absent. Returns the
    /// updated row.
    pub async fn increment(
        pool: &SqlitePool,
        track_id: DbId,
        counter: Counter,
    ) -> Result<TrackMetrics, sqlx::Error> {
        let column = counter.column();
        let query = format!(
            "INSERT INTO track_metrics (track_id, {column}) VALUES ($1, 1) \
             ON CONFLICT (track_id) DO UPDATE SET {column} = track_metrics.{column} + 1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackMetrics>(&query)
            .bind(track_id)
            .fetch_one(pool)
            .await
    }

    /// Find the metrics row for a track without creating it.
    pub async fn find(pool: &SqlitePool, track_id: DbId) -> Result<Option<TrackMetrics>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM track_metrics WHERE track_id = $1");
        sqlx::query_as::<_, TrackMetrics>(&query)
            .bind(track_id)
            .fetch_optional(pool)
            .await
    }
}
