//! Tag API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/tags` - List tags, optionally filtered by name (public)
//! - `POST /api/v1/tags` - Create a tag (admin)
//! - `GET /api/v1/tags/most-used` - Most used tag of the top customer (public)
//! - `GET /api/v1/tags/:id` - Get a tag (public)
//! - `DELETE /api/v1/tags/:id` - Delete a tag (admin)

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::{
    commands::{CreateTagCommand, CreateTagError, DeleteTagCommand, DeleteTagError},
    queries::{
        GetTagError, GetTagQuery, ListTagsError, ListTagsQuery, MostUsedTagError,
        MostUsedTagQuery,
    },
};
use crate::{
    api::response::{created, ApiResponse},
    auth::AdminUser,
    error::{ApiResult, AppError},
    features::shared::pagination::PageLinks,
};

// ============================================================================
// Router Configuration
// ============================================================================

pub fn tags_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/most-used", get(most_used_tag))
        .route("/:id", get(get_tag).delete(delete_tag))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a tag
///
/// # Endpoint
///
/// `POST /api/v1/tags`
///
/// # Response
///
/// - `201 Created` - Tag created
/// - `400 Bad Request` - Name empty or too long
/// - `409 Conflict` - Tag with that name already exists
#[tracing::instrument(skip(pool, _admin, command), fields(name = %command.name))]
async fn create_tag(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Json(command): Json<CreateTagCommand>,
) -> ApiResult<Response> {
    let tag = super::commands::create::handle(pool, command).await?;

    Ok(created(tag))
}

/// Delete a tag
///
/// # Endpoint
///
/// `DELETE /api/v1/tags/:id`
///
/// # Response
///
/// - `200 OK` - Tag deleted and detached everywhere
/// - `404 Not Found` - Tag not found
#[tracing::instrument(skip(pool, _admin), fields(tag_id = id))]
async fn delete_tag(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteTagCommand { id }).await?;

    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List tags
///
/// # Endpoint
///
/// `GET /api/v1/tags?text_part=spa&page=1&per_page=50`
#[tracing::instrument(skip(pool, uri, query))]
async fn list_tags(
    State(pool): State<PgPool>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ListTagsQuery>,
) -> ApiResult<Response> {
    let filters = query.link_filters();

    let page = super::queries::list::handle(pool, query).await?;

    let links = PageLinks::build(uri.path(), &filters, &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

/// Get a tag
///
/// # Endpoint
///
/// `GET /api/v1/tags/:id`
#[tracing::instrument(skip(pool), fields(tag_id = id))]
async fn get_tag(State(pool): State<PgPool>, Path(id): Path<i64>) -> ApiResult<Response> {
    let tag = super::queries::get::handle(pool, GetTagQuery { id }).await?;

    Ok(ApiResponse::success(tag).into_response())
}

/// Most widely used tag among the certificates ordered by the top customer
///
/// # Endpoint
///
/// `GET /api/v1/tags/most-used`
///
/// # Response
///
/// - `200 OK` - The tag, its usage count and the customer it was computed for
/// - `404 Not Found` - No orders with tagged certificates yet
#[tracing::instrument(skip(pool))]
async fn most_used_tag(State(pool): State<PgPool>) -> ApiResult<Response> {
    let response = super::queries::most_used::handle(pool, MostUsedTagQuery::default()).await?;

    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateTagError> for AppError {
    fn from(err: CreateTagError) -> Self {
        match err {
            CreateTagError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            CreateTagError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            CreateTagError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteTagError> for AppError {
    fn from(err: DeleteTagError) -> Self {
        match err {
            DeleteTagError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteTagError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetTagError> for AppError {
    fn from(err: GetTagError) -> Self {
        match err {
            GetTagError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetTagError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListTagsError> for AppError {
    fn from(err: ListTagsError) -> Self {
        match err {
            ListTagsError::Pagination(_) => AppError::InvalidArgument(err.to_string()),
            ListTagsError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<MostUsedTagError> for AppError {
    fn from(err: MostUsedTagError) -> Self {
        match err {
            MostUsedTagError::NotFound => AppError::NotFound(err.to_string()),
            MostUsedTagError::Database(e) => AppError::Database(e),
        }
    }
}
