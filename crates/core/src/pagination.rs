//! 1-indexed page arithmetic for catalog listings.

use serde::Serialize;

use crate::error::CoreError;

/// Tracks per catalog page.
pub const DEFAULT_PAGE_SIZE: i64 = 9;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Build a page request from an optional `?page=` value (default 1).
    pub fn new(page: Option<i64>, per_page: i64) -> Result<Self, CoreError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(CoreError::Validation(format!(
                "Page must be at least 1, got {page}"
            )));
        }
        if per_page < 1 {
            return Err(CoreError::Validation(format!(
                "Page size must be at least 1, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    /// Row offset for `LIMIT ... OFFSET ...`.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Describe this page against a total row count.
    ///
    /// Asking for a page past the last one is not found, except page 1 which
    /// is always valid (an empty catalog still has a first page).
    pub fn info(&self, total: i64) -> Result<PageInfo, CoreError> {
        let pages = if total == 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        };
        if self.page > 1 && self.page > pages {
            return Err(CoreError::NotFound {
                entity: "Page",
                id: self.page,
            });
        }
        Ok(PageInfo {
            page: self.page,
            per_page: self.per_page,
            total,
            pages,
            has_prev: self.page > 1,
            has_next: self.page < pages,
        })
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
}
