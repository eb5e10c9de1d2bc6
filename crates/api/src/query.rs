//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Catalog page selector (`?page=`). Pages are 1-indexed; missing means 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}
