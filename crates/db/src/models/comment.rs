//! Comment model and DTOs. Comments are immutable once created.

use serde::Serialize;
use sqlx::FromRow;
use soundshelf_core::types::{Date, DbId};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub date: Date,
    pub user_id: DbId,
    pub track_id: DbId,
    pub content: String,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
}

/// DTO for posting a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub date: Date,
    pub user_id: DbId,
    pub track_id: DbId,
    pub content: String,
}
