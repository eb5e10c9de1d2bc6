use serde::Serialize;
use sqlx::FromRow;
use soundshelf_core::types::DbId;

/// A row from the `genres` table (read-only reference data).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Genre {
    pub id: DbId,
    pub name: String,
}
