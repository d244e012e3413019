//! Review API routes, merged into the certificates router
//!
//! - `GET /api/v1/certificates/:id/reviews` - Reviews of a certificate
//! - `POST /api/v1/certificates/:id/reviews` - Review a certificate

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::{
    commands::{CreateReviewCommand, CreateReviewError},
    queries::{ListReviewsError, ListReviewsQuery},
};
use crate::{
    api::response::{created, ApiResponse},
    auth::AuthUser,
    error::{ApiResult, AppError},
    features::shared::pagination::PageLinks,
};

pub fn reviews_routes() -> Router<PgPool> {
    Router::new().route("/:id/reviews", get(list_reviews).post(create_review))
}

/// Review a certificate as the caller
///
/// The review is addressed to the certificate's assigned developer.
///
/// # Endpoint
///
/// `POST /api/v1/certificates/:id/reviews`
///
/// # Request Body
///
/// ```json
/// { "comment": "Great weekend", "rating": 5 }
/// ```
///
/// # Response
///
/// - `201 Created` - Review
/// - `400 Bad Request` - Rating or comment out of range
/// - `404 Not Found` - Certificate not found
/// - `409 Conflict` - No developer is assigned to the certificate
#[tracing::instrument(skip(pool, caller, command), fields(certificate_id = id))]
async fn create_review(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path(id): Path<i64>,
    Json(mut command): Json<CreateReviewCommand>,
) -> ApiResult<Response> {
    command.certificate_id = id;
    command.creator_id = caller.user_id();

    let review = super::commands::create::handle(pool, command).await?;

    Ok(created(review))
}

/// Reviews of a certificate, newest first
///
/// # Endpoint
///
/// `GET /api/v1/certificates/:id/reviews?page=1&per_page=50`
#[tracing::instrument(skip(pool, uri, query), fields(certificate_id = id))]
async fn list_reviews(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    OriginalUri(uri): OriginalUri,
    Query(mut query): Query<ListReviewsQuery>,
) -> ApiResult<Response> {
    query.certificate_id = id;
    let page = super::queries::list::handle(pool, query).await?;

    let links = PageLinks::build(uri.path(), &[], &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

impl From<CreateReviewError> for AppError {
    fn from(err: CreateReviewError) -> Self {
        match err {
            CreateReviewError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            CreateReviewError::CertificateNotFound(_) | CreateReviewError::UserNotFound(_) => {
                AppError::NotFound(err.to_string())
            },
            CreateReviewError::NoDeveloper(_) => AppError::Conflict(err.to_string()),
            CreateReviewError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListReviewsError> for AppError {
    fn from(err: ListReviewsError) -> Self {
        match err {
            ListReviewsError::CertificateNotFound(_) => AppError::NotFound(err.to_string()),
            ListReviewsError::Pagination(_) => AppError::InvalidArgument(err.to_string()),
            ListReviewsError::Database(e) => AppError::Database(e),
        }
    }
}
