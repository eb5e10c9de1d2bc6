//! Handlers for the caller's own account (`/account`).

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use soundshelf_core::accounts::UpdateProfileForm;
use soundshelf_core::error::CoreError;
use soundshelf_core::media::{DEFAULT_PROFILE_IMAGE, PROFILE_PICS_PREFIX};
use soundshelf_core::validation::validate_input;
use soundshelf_db::models::user::{UpdateProfile, User};
use soundshelf_db::repositories::UserRepo;

use super::upload::{discard_blobs, store_image, MultipartForm};
use crate::auth::jwt::generate_reset_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /account/reset-token`.
#[derive(Debug, Serialize)]
pub struct ResetTokenResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// GET /api/v1/account
pub async fn get_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<User>>> {
    let user = find_user(&state, &auth_user).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/account
///
/// Multipart form with `username`, optional `bank_details` and an optional
/// `picture` file. A new picture is downscaled before it is stored and
/// replaces the previous one in storage.
pub async fn update_account(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<User>>> {
    let mut form = MultipartForm::read(multipart).await?;
    let previous = find_user(&state, &auth_user).await?;

    let input = UpdateProfileForm {
        username: form.text("username").unwrap_or_default().to_string(),
        bank_details: form.non_empty_text("bank_details").map(str::to_string),
    };
    validate_input(&input)?;

    if UserRepo::username_taken(&state.pool, &input.username, Some(auth_user.user_id)).await? {
        return Err(AppError::Core(CoreError::Validation(
            "username: That username is taken. Please choose a different one".into(),
        )));
    }

    let image_file = match form.take_file("picture") {
        Some(file) => Some(store_image(&state, &file, PROFILE_PICS_PREFIX).await?),
        None => None,
    };

    let updated = UserRepo::update_profile(
        &state.pool,
        auth_user.user_id,
        &UpdateProfile {
            username: input.username,
            image_file: image_file.clone(),
            bank_details: input.bank_details,
        },
    )
    .await;

    let user = match updated {
        Ok(Some(user)) => user,
        Ok(None) => {
            discard_blobs(&state, image_file).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: auth_user.user_id,
            }));
        }
        Err(e) => {
            discard_blobs(&state, image_file).await;
            return Err(e.into());
        }
    };

    if image_file.is_some() && previous.image_file != DEFAULT_PROFILE_IMAGE {
        discard_blobs(&state, [previous.image_file]).await;
    }

    tracing::info!(user_id = user.id, "Account updated");
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/account/reset-token
///
/// Issue a password-reset token for the caller. Delivering it out of band
/// is left to the client.
pub async fn issue_reset_token(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<ResetTokenResponse>>> {
    let user = find_user(&state, &auth_user).await?;

    let token = generate_reset_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Issued password reset token");

    Ok(Json(DataResponse {
        data: ResetTokenResponse {
            token,
            expires_in: state.config.jwt.reset_token_expiry_mins * 60,
        },
    }))
}

async fn find_user(state: &AppState, auth_user: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))
}
