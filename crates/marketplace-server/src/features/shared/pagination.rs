//! Shared pagination utilities
//!
//! Provides common pagination types and helpers used across list queries, plus
//! the navigation links (`self`, `first`, `prev`, `next`, `last`) that paged
//! responses carry in their `meta` block.
//!
//! # Examples
//!
//! ```rust,ignore
//! use marketplace_server::features::shared::pagination::{PaginationParams, PaginationMetadata};
//!
//! let params = PaginationParams::new(Some(2), Some(20));
//! params.validate()?;
//! let offset = params.offset();
//!
//! // After fetching data...
//! let metadata = PaginationMetadata::from_params(&params, 100);
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not supply one.
pub const DEFAULT_PER_PAGE: i64 = 50;

/// Largest page size a caller may request.
pub const MAX_PER_PAGE: i64 = 100;

/// Errors raised for out-of-range pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("Page number must be greater or equal to 1")]
    InvalidPage,

    #[error("per_page must be between 1 and {MAX_PER_PAGE}")]
    InvalidPerPage,
}

/// Common pagination request parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    /// Items per page. Defaults to [`DEFAULT_PER_PAGE`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Create new pagination parameters
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    /// Get the page number (1-indexed), defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get items per page, defaulting to [`DEFAULT_PER_PAGE`] and clamped to 1..=[`MAX_PER_PAGE`]
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Calculate the offset for SQL OFFSET clause
    ///
    /// Saturates instead of overflowing, so a huge page number just selects
    /// past the end of the result set.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    /// Reject explicit values outside the accepted ranges
    pub fn validate(&self) -> Result<(), PaginationError> {
        if matches!(self.page, Some(page) if page < 1) {
            return Err(PaginationError::InvalidPage);
        }
        if matches!(self.per_page, Some(per_page) if !(1..=MAX_PER_PAGE).contains(&per_page)) {
            return Err(PaginationError::InvalidPerPage);
        }
        Ok(())
    }
}

/// Pagination metadata for response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMetadata {
    /// Current page number (1-indexed)
    pub page: i64,

    /// Items per page
    pub per_page: i64,

    /// Total number of items matching the filters
    pub total: i64,

    /// Total number of pages
    pub pages: i64,

    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    /// Create new pagination metadata from query results
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + per_page - 1) / per_page
        };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }

    /// Create pagination metadata from params and total count
    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        Self::new(params.page(), params.per_page(), total)
    }
}

/// Wrapper for paginated list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// List of items for the current page
    pub items: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    /// Create a new paginated response
    pub fn new(items: Vec<T>, pagination: PaginationMetadata) -> Self {
        Self { items, pagination }
    }

    /// Create a paginated response from items, params, and total count
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }

    /// Map items to a different type
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Navigation links for a paged response
///
/// Every link repeats the request's filter parameters so that following it
/// yields the next slice of the same result set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: String,
    pub first: String,
    pub last: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl PageLinks {
    /// Build links for `base_path` given the active filters and the page metadata.
    ///
    /// Filters with empty values are left out of the generated query strings.
    pub fn build(base_path: &str, filters: &[(&str, String)], meta: &PaginationMetadata) -> Self {
        let link = |page: i64| {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in filters.iter().filter(|(_, v)| !v.is_empty()) {
                query.append_pair(key, value);
            }
            query.append_pair("page", &page.to_string());
            query.append_pair("per_page", &meta.per_page.to_string());
            format!("{}?{}", base_path, query.finish())
        };

        let last_page = meta.pages.max(1);

        Self {
            self_link: link(meta.page),
            first: link(1),
            last: link(last_page),
            prev: meta.has_prev.then(|| link((meta.page - 1).min(last_page))),
            next: meta.has_next.then(|| link(meta.page + 1)),
        }
    }
}
