//! Track entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use soundshelf_core::types::{Date, DbId};

/// A row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub title: String,
    pub creator_id: DbId,
    pub cover_image_file: String,
    pub upload_date: Date,
    pub genre_id: Option<DbId>,
    pub shareable: bool,
    pub premium: bool,
}

/// A track joined with its creator's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackWithCreator {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub track: Track,
    pub creator_username: String,
}

/// DTO for inserting an uploaded track.
#[derive(Debug, Clone)]
pub struct CreateTrack {
    pub title: String,
    pub creator_id: DbId,
    /// `None` keeps the schema default cover.
    pub cover_image_file: Option<String>,
    pub upload_date: Date,
    pub genre_id: Option<DbId>,
    pub shareable: bool,
    pub premium: bool,
}
