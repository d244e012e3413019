//! Shared utilities and types for feature modules
//!
//! This module contains reusable code to reduce duplication across feature implementations.
//!
//! # Contents
//!
//! - **pagination**: Common pagination types, metadata and navigation links
//! - **validation**: Input validation utilities
//! - **error_helpers**: Database error handling utilities
//! - **test_helpers**: Test fixtures and utilities (test-only)

pub mod error_helpers;
pub mod pagination;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types
pub use pagination::{PageLinks, Paginated, PaginationError, PaginationMetadata, PaginationParams};
pub use validation::{validate_login, validate_range, validate_text, FieldValidationError};
