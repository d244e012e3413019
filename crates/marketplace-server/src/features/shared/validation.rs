//! Shared validation utilities
//!
//! Provides common field checks for commands and queries. Bounds are passed in
//! by the caller so each entity keeps its own limits next to its command types.
//!
//! # Examples
//!
//! ```rust,ignore
//! use marketplace_server::features::shared::validation::{validate_text, validate_range};
//!
//! validate_text("name", &command.name, 5, 50)?;
//! validate_range("duration", &command.duration, &1, &100)?;
//! ```

use std::fmt::Display;
use thiserror::Error;

/// Errors that can occur during field validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} must be between {min} and {max}")]
    Range {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("{field} {reason}")]
    Format {
        field: &'static str,
        reason: &'static str,
    },
}

/// Validate a free-text field
///
/// # Rules
/// - Must not be blank
/// - Length (in characters, after trimming) must be within `min..=max`
pub fn validate_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), FieldValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldValidationError::Required { field });
    }

    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(FieldValidationError::Length { field, min, max });
    }

    Ok(())
}

/// Validate that a value lies within an inclusive range
pub fn validate_range<T>(
    field: &'static str,
    value: &T,
    min: &T,
    max: &T,
) -> Result<(), FieldValidationError>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(FieldValidationError::Range {
            field,
            min: min.to_string(),
            max: max.to_string(),
        });
    }
    Ok(())
}

/// Validate a login name
///
/// # Rules
/// - `min..=max` characters
/// - ASCII letters, digits, `_` and `.` only
pub fn validate_login(value: &str, min: usize, max: usize) -> Result<(), FieldValidationError> {
    let field = "login";
    if value.is_empty() {
        return Err(FieldValidationError::Required { field });
    }

    let len = value.chars().count();
    if len < min || len > max {
        return Err(FieldValidationError::Length { field, min, max });
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(FieldValidationError::Format {
            field,
            reason: "can only contain letters, digits, '_' and '.'",
        });
    }

    Ok(())
}
