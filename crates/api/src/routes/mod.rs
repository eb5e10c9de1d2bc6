pub mod account;
pub mod auth;
pub mod genres;
pub mod health;
pub mod media;
pub mod playlist;
pub mod tracks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout (auth)
/// /auth/password-reset               reset password with a token (public)
///
/// /account                           get, update (auth)
/// /account/reset-token               issue reset token (auth)
///
/// /genres                            list
///
/// /tracks                            list (?page=), upload (creator)
/// /tracks/genre/{genre}              list by genre (?page=)
/// /tracks/{id}                       view (counts a play), delete (owner)
/// /tracks/{id}/detail                detail with comments and averages
/// /tracks/{id}/audio                 audio stream
/// /tracks/{id}/like                  like (auth)
/// /tracks/{id}/dislike               dislike (auth)
/// /tracks/{id}/save                  save to playlist (auth)
/// /tracks/{id}/comments              comment (auth)
///
/// /playlist                          caller's playlist (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/account", account::router())
        .nest("/genres", genres::router())
        .nest("/tracks", tracks::router())
        .nest("/playlist", playlist::router())
}
