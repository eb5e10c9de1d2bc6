//! Route definitions for the `/account` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::account;
use crate::state::AppState;

/// Routes mounted at `/account`. All require auth.
///
/// ```text
/// GET  /              -> get_account
/// PUT  /              -> update_account (multipart)
/// POST /reset-token   -> issue_reset_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(account::get_account).put(account::update_account))
        .route("/reset-token", post(account::issue_reset_token))
}
