//! Serving stored uploads.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use soundshelf_core::media::content_type_for;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /media/{*key}
///
/// Returns the stored bytes for a storage key such as
/// `covers/0a1b2c3d4e5f6071.png`. Keys that try to leave the store are
/// rejected with 400; unknown keys are 404.
pub async fn serve_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.blob_store.get(&key).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&key))], bytes))
}
