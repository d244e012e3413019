pub mod list;

pub use list::{ListReviewsError, ListReviewsQuery, ListReviewsResponse};
