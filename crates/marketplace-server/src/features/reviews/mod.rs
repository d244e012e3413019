//! Certificate reviews

pub mod commands;
pub mod model;
pub mod queries;
pub mod routes;

pub use commands::CreateReviewCommand;
pub use model::Review;
pub use queries::ListReviewsQuery;
pub use routes::reviews_routes;
