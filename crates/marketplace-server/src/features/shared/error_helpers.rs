//! Database error handling utilities
//!
//! Helpers for recognising constraint violations raised by PostgreSQL so that
//! handlers can translate them into their own conflict variants.
//!
//! # Examples
//!
//! ```rust,ignore
//! use marketplace_server::features::shared::error_helpers::map_unique_violation;
//!
//! sqlx::query("INSERT INTO tags (name) VALUES ($1)")
//!     .bind(&command.name)
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| map_unique_violation(e, CreateTagError::Duplicate(name), CreateTagError::Database))?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db_err) if db_err.is_unique_violation())
}

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    matches!(error, SqlxError::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Return `unique_error` on a unique violation, otherwise wrap the original error
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

/// Return `fk_error` on a foreign key violation, otherwise wrap the original error
pub fn map_foreign_key_violation<E, F>(error: SqlxError, fk_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_foreign_key_violation(&error) {
        fk_error
    } else {
        default_wrapper(error)
    }
}
