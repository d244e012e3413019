use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const RATING_MIN: i16 = 1;
pub const RATING_MAX: i16 = 5;
pub const COMMENT_MAX_LENGTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub certificate_id: i64,
    pub creator_id: i64,
    pub developer_id: i64,
    pub comment: String,
    pub rating: i16,
    pub review_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("Rating must be between 1 and 5")]
    Rating,

    #[error("Comment must be between 1 and 1000 characters")]
    Comment,
}

pub fn validate_review(comment: &str, rating: i16) -> Result<(), ReviewValidationError> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(ReviewValidationError::Rating);
    }
    let length = comment.trim().chars().count();
    if length == 0 || length > COMMENT_MAX_LENGTH {
        return Err(ReviewValidationError::Comment);
    }
    Ok(())
}
