use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Page request for listing calls.
///
/// `limit == 0` is the "fetch everything" sentinel: the listing is returned
/// whole and `page` is ignored. Pages are 1-based; page 0 with a non-zero
/// limit is read as page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    pub const ALL: Pagination = Pagination { page: 0, limit: 0 };

    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit }
    }

    pub fn is_unpaginated(&self) -> bool {
        self.limit == 0
    }

    pub fn offset(&self) -> usize {
        if self.is_unpaginated() {
            return 0;
        }
        (self.page.max(1) - 1).saturating_mul(self.limit) as usize
    }

    /// Cuts one page out of an already ordered listing.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_unpaginated() {
            return items;
        }
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect()
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        if self.is_unpaginated() {
            return u64::from(total > 0);
        }
        total.div_ceil(self.limit)
    }
}

/// One page of a listing plus the size of the whole listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
