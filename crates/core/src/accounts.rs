//! Request DTOs for registration, login, profile updates and password reset.

use serde::Deserialize;
use validator::Validate;

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
    /// Sign up as a music creator instead of a listener.
    #[serde(default)]
    pub creator: bool,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Keep the session alive for the long "remember me" window.
    #[serde(default)]
    pub remember: bool,
}

/// Text fields of the multipart `PUT /account` form.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: String,
    #[validate(length(min = 10, max = 50, message = "Bank details must be 10 to 50 characters"))]
    pub bank_details: Option<String>,
}

/// Body of `POST /auth/password-reset`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}
