//! Catalog reference data and the upload/comment forms.
//!
//! Forms never query the store themselves: genre choices are fetched by the
//! caller and handed to [`NewTrackForm::validate_with_genres`].

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::validate_input;

/// Genres seeded by the setup utility.
pub const SEED_GENRES: &[&str] = &["Rock", "Pop", "Jazz", "Classical", "Others"];

/// Text fields of the multipart `POST /tracks` form.
#[derive(Debug, Clone, Validate)]
pub struct NewTrackForm {
    #[validate(length(min = 1, max = 40, message = "Title must be 1 to 40 characters"))]
    pub title: String,
    pub genre_id: DbId,
    pub shareable: bool,
    pub premium: bool,
}

impl NewTrackForm {
    /// Validate field rules and that `genre_id` is one of `genre_ids`.
    pub fn validate_with_genres(&self, genre_ids: &[DbId]) -> Result<(), CoreError> {
        validate_input(self)?;
        validate_genre_choice(self.genre_id, genre_ids)
    }
}

/// Ensure a submitted genre id is among the known choices.
pub fn validate_genre_choice(genre_id: DbId, genre_ids: &[DbId]) -> Result<(), CoreError> {
    if genre_ids.contains(&genre_id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "genre_id: {genre_id} is not a valid choice"
        )))
    }
}

/// Body of `POST /tracks/{id}/comments`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, max = 255, message = "Comment must be 1 to 255 characters"))]
    pub content: String,
}
