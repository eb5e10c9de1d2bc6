//! Media file naming and image downscaling.
//!
//! Storage keys are relative, `/`-separated paths understood by every
//! [`BlobStore`](crate::storage::BlobStore) backend:
//!
//! - `audio/{track_id}.mp3` -- derived from the committed primary key.
//! - `covers/{16 hex}.{ext}` and `profile_pics/{16 hex}.{ext}` -- random names.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use rand::Rng;

use crate::error::CoreError;
use crate::types::DbId;

/// Longest edge (in pixels) of stored profile pictures and covers.
pub const MAX_IMAGE_EDGE: u32 = 300;

/// Key prefix for uploaded audio.
pub const AUDIO_PREFIX: &str = "audio";
/// Key prefix for track cover images.
pub const COVERS_PREFIX: &str = "covers";
/// Key prefix for user profile pictures.
pub const PROFILE_PICS_PREFIX: &str = "profile_pics";

/// Cover a track keeps until one is uploaded. Not a stored blob.
pub const DEFAULT_COVER_FILE: &str = "default_cover.jpg";
/// Profile picture a user keeps until one is uploaded. Not a stored blob.
pub const DEFAULT_PROFILE_IMAGE: &str = "default.jpg";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("File '{0}' has no extension")]
    MissingExtension(String),

    #[error("Unsupported file type '.{extension}'. Allowed: {allowed}")]
    UnsupportedExtension { extension: String, allowed: String },

    #[error("Unsupported image format {0:?}. Allowed: jpeg, png")]
    UnsupportedFormat(ImageFormat),

    #[error("Invalid image: {0}")]
    Image(#[from] image::ImageError),
}

impl From<MediaError> for CoreError {
    fn from(err: MediaError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Lowercased extension of `filename`, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Ensure `filename` is a `jpg`/`jpeg`/`png` image, returning its extension.
pub fn image_extension(filename: &str) -> Result<String, MediaError> {
    let ext = file_extension(filename)
        .ok_or_else(|| MediaError::MissingExtension(filename.to_string()))?;
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(MediaError::UnsupportedExtension {
            extension: ext,
            allowed: IMAGE_EXTENSIONS.join(", "),
        })
    }
}

/// Ensure `filename` is an MP3 file.
pub fn ensure_audio_file(filename: &str) -> Result<(), MediaError> {
    let ext = file_extension(filename)
        .ok_or_else(|| MediaError::MissingExtension(filename.to_string()))?;
    if ext == AUDIO_EXTENSION {
        Ok(())
    } else {
        Err(MediaError::UnsupportedExtension {
            extension: ext,
            allowed: AUDIO_EXTENSION.to_string(),
        })
    }
}

/// Storage key of a track's audio file.
pub fn audio_key(track_id: DbId) -> String {
    format!("{AUDIO_PREFIX}/{track_id}.{AUDIO_EXTENSION}")
}

/// Collision-resistant storage key for an uploaded image: 8 random bytes,
/// hex encoded, under `prefix`.
pub fn random_image_key(prefix: &str, extension: &str) -> String {
    let bytes: [u8; 8] = rand::rng().random();
    let name: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("{prefix}/{name}.{extension}")
}

/// MIME type served for a storage key, by extension.
pub fn content_type_for(key: &str) -> &'static str {
    match file_extension(key).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Dimensions that fit `width` x `height` inside a `max_edge` square while
/// preserving aspect ratio. Never upscales.
pub fn fit_within(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let max_edge = max_edge.max(1);
    if width == 0 || height == 0 {
        return (1, 1);
    }
    if width <= max_edge && height <= max_edge {
        return (width, height);
    }
    let scale = |side: u32, longest: u32| -> u32 {
        let scaled = (u64::from(side) * u64::from(max_edge) + u64::from(longest) / 2)
            / u64::from(longest);
        scaled.max(1) as u32
    };
    if width >= height {
        (max_edge, scale(height, width))
    } else {
        (scale(width, height), max_edge)
    }
}

/// An image re-encoded after downscaling.
#[derive(Debug)]
pub struct DownscaledImage {
    pub bytes: Vec<u8>,
    /// Format detected from the content, not from the uploaded filename.
    pub format: ImageFormat,
}

impl DownscaledImage {
    /// Storage key extension matching the encoded bytes.
    pub fn extension(&self) -> &'static str {
        match self.format {
            ImageFormat::Jpeg => "jpg",
            _ => "png",
        }
    }
}

/// Decode an uploaded image, shrink it to fit `max_edge`, and re-encode it in
/// its original format. Only JPEG and PNG content is accepted.
pub fn downscale_image(bytes: &[u8], max_edge: u32) -> Result<DownscaledImage, MediaError> {
    let format = image::guess_format(bytes)?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(MediaError::UnsupportedFormat(format));
    }
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = (decoded.width(), decoded.height());
    let (target_w, target_h) = fit_within(width, height, max_edge);

    let resized = if (target_w, target_h) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel.
    let resized = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format)?;
    Ok(DownscaledImage {
        bytes: out.into_inner(),
        format,
    })
}
