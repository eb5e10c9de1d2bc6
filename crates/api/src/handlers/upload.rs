//! Multipart form collection and image storage shared by the upload and
//! profile handlers.

use std::collections::HashMap;

use axum::extract::Multipart;
use soundshelf_core::media::{downscale_image, image_extension, random_image_key, MAX_IMAGE_EDGE};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A file part of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// All parts of a multipart form, split into text fields and files.
///
/// File inputs submitted without a selection (empty name and body) are
/// dropped, so an untouched optional file input reads as absent.
#[derive(Debug, Default)]
pub struct MultipartForm {
    text: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    if filename.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            filename,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.text.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Trimmed text value of a field, if present.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(|s| s.trim())
    }

    /// Trimmed text value of a field, treating blank as absent.
    pub fn non_empty_text(&self, name: &str) -> Option<&str> {
        self.text(name).filter(|s| !s.is_empty())
    }

    /// Checkbox semantics: `true`, `on`, `yes` and `1` are set; anything
    /// else, including absence, is unset.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name).is_some_and(|v| {
            matches!(v.to_ascii_lowercase().as_str(), "true" | "on" | "yes" | "1")
        })
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Downscale an uploaded image to fit the thumbnail box and store it under
/// a random key below `prefix`. Returns the storage key.
///
/// The filename must carry an image extension, but the key's extension
/// follows the decoded content so the served MIME type matches the bytes.
pub async fn store_image(state: &AppState, file: &UploadedFile, prefix: &str) -> AppResult<String> {
    image_extension(&file.filename)?;
    let resized = downscale_image(&file.bytes, MAX_IMAGE_EDGE)?;
    let key = random_image_key(prefix, resized.extension());
    state.blob_store.put(&key, &resized.bytes).await?;
    tracing::debug!(key = %key, bytes = resized.bytes.len(), "Stored image");
    Ok(key)
}

/// Best-effort removal of stored files that are no longer referenced.
/// Failures are logged and otherwise ignored.
pub async fn discard_blobs(state: &AppState, keys: impl IntoIterator<Item = String>) {
    for key in keys {
        if let Err(e) = state.blob_store.delete(&key).await {
            tracing::warn!(key = %key, error = %e, "Failed to remove stored file");
        }
    }
}
