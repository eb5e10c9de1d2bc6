//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use soundshelf_core::types::DbId;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub image_file: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub bank_details: Option<String>,
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// DTO for a profile update. `None` fields are left unchanged.
#[derive(Debug, Clone)]
pub struct UpdateProfile {
    pub username: String,
    pub image_file: Option<String>,
    pub bank_details: Option<String>,
}
