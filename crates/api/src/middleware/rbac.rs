//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use soundshelf_core::error::CoreError;
use soundshelf_core::roles::ROLE_CREATOR;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `creator` role. Rejects with 403 Forbidden otherwise, or 401
/// when no valid token is present.
///
/// ```ignore
/// async fn upload(RequireCreator(user): RequireCreator) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCreator(pub AuthUser);

impl FromRequestParts<AppState> for RequireCreator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_CREATOR {
            return Err(AppError::Core(CoreError::Forbidden(
                "Creator role required to upload music".into(),
            )));
        }
        Ok(RequireCreator(user))
    }
}
