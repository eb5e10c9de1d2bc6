//! Like / dislike endpoints. Views are counted by `GET /tracks/{id}`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use soundshelf_core::metrics::Counter;
use soundshelf_core::types::DbId;
use soundshelf_db::repositories::MetricsRepo;

use super::tracks::find_track;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// New value of the counter that was bumped.
#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub track_id: DbId,
    pub counter: &'static str,
    pub count: i64,
}

/// POST /api/v1/tracks/{id}/like
pub async fn like_track(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CounterResponse>>> {
    bump(&state, &auth_user, id, Counter::Like).await
}

/// POST /api/v1/tracks/{id}/dislike
pub async fn dislike_track(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CounterResponse>>> {
    bump(&state, &auth_user, id, Counter::Dislike).await
}

async fn bump(
    state: &AppState,
    auth_user: &AuthUser,
    track_id: DbId,
    counter: Counter,
) -> AppResult<Json<DataResponse<CounterResponse>>> {
    find_track(state, track_id).await?;
    let metrics = MetricsRepo::increment(&state.pool, track_id, counter).await?;

    let (name, count) = match counter {
        Counter::Like => ("likes", metrics.like_count),
        Counter::Dislike => ("dislikes", metrics.dislike_count),
        Counter::View => ("views", metrics.view_count),
    };
    tracing::debug!(track_id, user_id = auth_user.user_id, counter = name, count, "Counter bumped");

    Ok(Json(DataResponse {
        data: CounterResponse {
            track_id,
            counter: name,
            count,
        },
    }))
}
