//! Engagement metric arithmetic (views, likes, dislikes).
//!
//! Counters only ever grow: there is no decrement and no per-user
//! deduplication of likes or dislikes.

use serde::Serialize;

use crate::types::Date;

/// One of the three per-track counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    View,
    Like,
    Dislike,
}

impl Counter {
    /// Column in `track_metrics` backing this counter.
    pub fn column(self) -> &'static str {
        match self {
            Counter::View => "view_count",
            Counter::Like => "like_count",
            Counter::Dislike => "dislike_count",
        }
    }
}

/// Raw counter values for a single track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricCounts {
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
}

/// Per-day averages since a track's upload date, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricAverages {
    pub days_since_release: i64,
    pub views_per_day: f64,
    pub likes_per_day: f64,
    pub dislikes_per_day: f64,
}

/// Whole days between `upload_date` and `today`, floored at 1.
///
/// Same-day uploads (and dates in the future) count as one day so the
/// averages never divide by zero.
pub fn days_since_release(upload_date: Date, today: Date) -> i64 {
    (today - upload_date).num_days().max(1)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute per-day averages of `counts` for a track uploaded on `upload_date`.
pub fn averages_since_release(counts: MetricCounts, upload_date: Date, today: Date) -> MetricAverages {
    let days = days_since_release(upload_date, today);
    let per_day = |n: i64| round2(n as f64 / days as f64);
    MetricAverages {
        days_since_release: days,
        views_per_day: per_day(counts.views),
        likes_per_day: per_day(counts.likes),
        dislikes_per_day: per_day(counts.dislikes),
    }
}
