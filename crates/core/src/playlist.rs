//! Default playlist constants and the outcome of saving a track.

use serde::Serialize;

/// Name given to the playlist created on a user's first save or view.
pub const DEFAULT_PLAYLIST_NAME: &str = "My Playlist";

/// Result of adding a track to a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Added,
    AlreadyPresent,
}

impl SaveOutcome {
    /// Map the affected-row count of an insert-if-absent to an outcome.
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            SaveOutcome::Added
        } else {
            SaveOutcome::AlreadyPresent
        }
    }

    /// User-facing message for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            SaveOutcome::Added => "Track saved to playlist!",
            SaveOutcome::AlreadyPresent => "Track already in playlist!",
        }
    }
}
