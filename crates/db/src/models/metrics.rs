use serde::Serialize;
use sqlx::FromRow;
use soundshelf_core::metrics::MetricCounts;
use soundshelf_core::types::DbId;

/// A row from the `track_metrics` table. Exactly one per track.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackMetrics {
    pub track_id: DbId,
    pub like_count: i64,
    pub dislike_count: i64,
    pub view_count: i64,
}

impl TrackMetrics {
    pub fn counts(&self) -> MetricCounts {
        MetricCounts {
            views: self.view_count,
            likes: self.like_count,
            dislikes: self.dislike_count,
        }
    }
}
