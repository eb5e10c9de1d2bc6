//! Handlers for the `/tracks` catalog: listing, viewing, detail, upload,
//! deletion, comments and audio streaming.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use soundshelf_core::catalog::{CommentForm, NewTrackForm};
use soundshelf_core::error::CoreError;
use soundshelf_core::media::{audio_key, ensure_audio_file, COVERS_PREFIX, DEFAULT_COVER_FILE};
use soundshelf_core::metrics::{averages_since_release, Counter, MetricAverages};
use soundshelf_core::pagination::{PageInfo, PageRequest, DEFAULT_PAGE_SIZE};
use soundshelf_core::types::DbId;
use soundshelf_core::validation::validate_input;
use soundshelf_db::models::comment::{Comment, CommentWithAuthor, CreateComment};
use soundshelf_db::models::metrics::TrackMetrics;
use soundshelf_db::models::track::{CreateTrack, Track, TrackWithCreator};
use soundshelf_db::repositories::{CommentRepo, GenreRepo, MetricsRepo, TrackRepo};

use super::upload::{discard_blobs, store_image, MultipartForm};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCreator;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One page of the catalog.
#[derive(Debug, Serialize)]
pub struct TrackPage {
    pub tracks: Vec<TrackWithCreator>,
    pub pagination: PageInfo,
    /// Every genre name, for building filters.
    pub genres: Vec<String>,
    /// The genre this page is filtered by, if any.
    pub genre: Option<String>,
}

/// A track with its current counters.
#[derive(Debug, Serialize)]
pub struct TrackView {
    #[serde(flatten)]
    pub track: TrackWithCreator,
    pub metrics: TrackMetrics,
}

/// Everything the detail page shows.
#[derive(Debug, Serialize)]
pub struct TrackDetail {
    #[serde(flatten)]
    pub track: TrackWithCreator,
    pub metrics: TrackMetrics,
    pub averages: MetricAverages,
    pub comments: Vec<CommentWithAuthor>,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks?page=
///
/// Newest uploads first, nine per page.
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<TrackPage>>> {
    let page = list_page(&state, None, params.page).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/tracks/genre/{genre}?page=
///
/// Same ordering as the full listing. An unknown genre name is 404 rather
/// than an empty page.
pub async fn list_tracks_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<TrackPage>>> {
    let found = GenreRepo::find_by_name(&state.pool, &genre)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundByName {
            entity: "Genre",
            name: genre,
        }))?;

    let page = list_page(&state, Some((found.id, found.name)), params.page).await?;
    Ok(Json(DataResponse { data: page }))
}

async fn list_page(
    state: &AppState,
    genre: Option<(DbId, String)>,
    page: Option<i64>,
) -> AppResult<TrackPage> {
    let request = PageRequest::new(page, DEFAULT_PAGE_SIZE)?;
    let genre_id = genre.as_ref().map(|(id, _)| *id);

    let total = TrackRepo::count(&state.pool, genre_id).await?;
    let pagination = request.info(total)?;
    let tracks =
        TrackRepo::list_page(&state.pool, genre_id, request.per_page, request.offset()).await?;
    let genres = GenreRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();

    Ok(TrackPage {
        tracks,
        pagination,
        genres,
        genre: genre.map(|(_, name)| name),
    })
}

// ---------------------------------------------------------------------------
// Single track
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks/{id}
///
/// Counts as a play: the view counter is incremented before responding.
pub async fn view_track(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrackView>>> {
    let track = find_track_with_creator(&state, id).await?;
    let metrics = MetricsRepo::increment(&state.pool, id, Counter::View).await?;
    Ok(Json(DataResponse {
        data: TrackView { track, metrics },
    }))
}

/// GET /api/v1/tracks/{id}/detail
///
/// Track, counters, per-day averages since release and comments. Does not
/// count as a view.
pub async fn track_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrackDetail>>> {
    let track = find_track_with_creator(&state, id).await?;
    let metrics = MetricsRepo::ensure(&state.pool, id).await?;
    let comments = CommentRepo::list_for_track(&state.pool, id).await?;
    let averages = averages_since_release(
        metrics.counts(),
        track.track.upload_date,
        Utc::now().date_naive(),
    );

    Ok(Json(DataResponse {
        data: TrackDetail {
            track,
            metrics,
            averages,
            comments,
        },
    }))
}

/// GET /api/v1/tracks/{id}/audio
pub async fn stream_audio(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_track(&state, id).await?;
    let bytes = state.blob_store.get(&audio_key(id)).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], bytes))
}

// ---------------------------------------------------------------------------
// Upload / delete
// ---------------------------------------------------------------------------

/// POST /api/v1/tracks
///
/// Multipart form: `title`, `genre_id`, `shareable`, `premium`, an optional
/// `cover` image and a required `.mp3` `audio` file. The audio is stored
/// under the id the insert assigned, inside the same transaction.
pub async fn upload_track(
    State(state): State<AppState>,
    RequireCreator(creator): RequireCreator,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Track>>)> {
    let mut form = MultipartForm::read(multipart).await?;

    let genre_id: DbId = form
        .text("genre_id")
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "genre_id: A genre must be chosen".into(),
            ))
        })?;

    let input = NewTrackForm {
        title: form.text("title").unwrap_or_default().to_string(),
        genre_id,
        shareable: form.flag("shareable"),
        premium: form.flag("premium"),
    };

    let genre_ids: Vec<DbId> = GenreRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|g| g.id)
        .collect();
    input.validate_with_genres(&genre_ids)?;

    if TrackRepo::title_exists(&state.pool, &input.title).await? {
        return Err(AppError::Core(CoreError::Validation(
            "title: That title is taken. Please choose a different one".into(),
        )));
    }

    let audio = form.take_file("audio").ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "audio: An audio file is required".into(),
        ))
    })?;
    ensure_audio_file(&audio.filename)?;

    let cover_image_file = match form.take_file("cover") {
        Some(file) => Some(store_image(&state, &file, COVERS_PREFIX).await?),
        None => None,
    };

    let new_track = CreateTrack {
        title: input.title,
        creator_id: creator.user_id,
        cover_image_file: cover_image_file.clone(),
        upload_date: Utc::now().date_naive(),
        genre_id: Some(input.genre_id),
        shareable: input.shareable,
        premium: input.premium,
    };

    let track = match insert_track(&state, &new_track, &audio.bytes).await {
        Ok(track) => track,
        Err(e) => {
            discard_blobs(&state, cover_image_file).await;
            return Err(e);
        }
    };

    tracing::info!(
        track_id = track.id,
        creator_id = creator.user_id,
        audio_bytes = audio.bytes.len(),
        "Track uploaded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// Insert the track and its metrics row and store its audio under the
/// assigned id, all inside one transaction. On failure nothing is committed
/// and any audio written is removed.
async fn insert_track(state: &AppState, input: &CreateTrack, audio: &[u8]) -> AppResult<Track> {
    let mut tx = state.pool.begin().await?;
    let track = TrackRepo::create(&mut *tx, input).await?;
    MetricsRepo::ensure(&mut *tx, track.id).await?;

    let key = audio_key(track.id);
    state.blob_store.put(&key, audio).await?;
    if let Err(e) = tx.commit().await {
        discard_blobs(state, [key]).await;
        return Err(e.into());
    }
    Ok(track)
}

/// DELETE /api/v1/tracks/{id}
///
/// Only the creator may delete a track. Comments, playlist entries and
/// metrics go with it.
pub async fn delete_track(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let track = find_track(&state, id).await?;
    if track.creator_id != auth_user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only delete your own tracks".into(),
        )));
    }

    if !TrackRepo::delete_with_dependents(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Track", id }));
    }

    let mut stale_keys = vec![audio_key(id)];
    if track.cover_image_file != DEFAULT_COVER_FILE {
        stale_keys.push(track.cover_image_file);
    }
    discard_blobs(&state, stale_keys).await;

    tracing::info!(track_id = id, user_id = auth_user.user_id, "Track deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// POST /api/v1/tracks/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CommentForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    validate_input(&input)?;
    find_track(&state, id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            date: Utc::now().date_naive(),
            user_id: auth_user.user_id,
            track_id: id,
            content: input.content,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_track(state: &AppState, id: DbId) -> AppResult<Track> {
    TrackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Track", id }))
}

async fn find_track_with_creator(state: &AppState, id: DbId) -> AppResult<TrackWithCreator> {
    TrackRepo::find_with_creator(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Track", id }))
}
