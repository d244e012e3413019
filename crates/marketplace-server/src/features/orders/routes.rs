//! Order API routes
//!
//! Merged into the users router:
//!
//! - `GET /api/v1/users/me/orders` - The caller's orders
//! - `POST /api/v1/users/me/orders` - Place an order
//! - `GET /api/v1/users/me/orders/:order_id` - One of the caller's orders
//! - `GET /api/v1/users/:id/orders` - Any user's orders (admin)

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::{
    commands::{CreateOrderCommand, CreateOrderError},
    queries::{GetUserOrderError, GetUserOrderQuery, ListUserOrdersError, ListUserOrdersQuery},
};
use crate::{
    api::response::{created, ApiResponse},
    auth::{AdminUser, AuthUser},
    error::{ApiResult, AppError},
    features::shared::pagination::PageLinks,
};

// ============================================================================
// Router Configuration
// ============================================================================

pub fn orders_routes() -> Router<PgPool> {
    Router::new()
        .route("/me/orders", get(list_my_orders).post(create_order))
        .route("/me/orders/:order_id", get(get_my_order))
        .route("/:id/orders", get(list_user_orders))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Place an order for the caller
///
/// # Endpoint
///
/// `POST /api/v1/users/me/orders`
///
/// # Request Body
///
/// ```json
/// { "certificate_ids": [1, 2] }
/// ```
///
/// # Response
///
/// - `201 Created` - Order with its priced lines
/// - `400 Bad Request` - No certificates given
/// - `404 Not Found` - Unknown certificate
/// - `409 Conflict` - A certificate is not `ACTIVE`
#[tracing::instrument(skip(pool, caller, command), fields(user_id = caller.user_id()))]
async fn create_order(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Json(mut command): Json<CreateOrderCommand>,
) -> ApiResult<Response> {
    command.user_id = caller.user_id();

    let response = super::commands::create::handle(pool, command).await?;

    Ok(created(response))
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// The caller's orders
///
/// # Endpoint
///
/// `GET /api/v1/users/me/orders?page=1&per_page=50`
#[tracing::instrument(skip(pool, caller, uri, query))]
async fn list_my_orders(
    State(pool): State<PgPool>,
    caller: AuthUser,
    OriginalUri(uri): OriginalUri,
    Query(mut query): Query<ListUserOrdersQuery>,
) -> ApiResult<Response> {
    query.user_id = caller.user_id();
    let page = super::queries::list::handle(pool, query).await?;

    let links = PageLinks::build(uri.path(), &[], &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

/// One of the caller's orders
///
/// # Endpoint
///
/// `GET /api/v1/users/me/orders/:order_id`
///
/// # Response
///
/// - `200 OK` - Order with its lines
/// - `404 Not Found` - The caller has no such order
#[tracing::instrument(skip(pool, caller))]
async fn get_my_order(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path(order_id): Path<i64>,
) -> ApiResult<Response> {
    let query = GetUserOrderQuery {
        user_id: caller.user_id(),
        order_id,
    };
    let response = super::queries::get::handle(pool, query).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Orders of any user
///
/// # Endpoint
///
/// `GET /api/v1/users/:id/orders?page=1&per_page=50`
#[tracing::instrument(skip(pool, _admin, uri, query), fields(user_id = id))]
async fn list_user_orders(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    OriginalUri(uri): OriginalUri,
    Query(mut query): Query<ListUserOrdersQuery>,
) -> ApiResult<Response> {
    query.user_id = id;
    let page = super::queries::list::handle(pool, query).await?;

    let links = PageLinks::build(uri.path(), &[], &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateOrderError> for AppError {
    fn from(err: CreateOrderError) -> Self {
        match err {
            CreateOrderError::Empty => AppError::InvalidArgument(err.to_string()),
            CreateOrderError::UserNotFound(_) | CreateOrderError::CertificatesNotFound(_) => {
                AppError::NotFound(err.to_string())
            },
            CreateOrderError::NotActive => AppError::Conflict(err.to_string()),
            CreateOrderError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListUserOrdersError> for AppError {
    fn from(err: ListUserOrdersError) -> Self {
        match err {
            ListUserOrdersError::UserNotFound(_) => AppError::NotFound(err.to_string()),
            ListUserOrdersError::Pagination(_) => AppError::InvalidArgument(err.to_string()),
            ListUserOrdersError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetUserOrderError> for AppError {
    fn from(err: GetUserOrderError) -> Self {
        match err {
            GetUserOrderError::NotFound { .. } => AppError::NotFound(err.to_string()),
            GetUserOrderError::Database(e) => AppError::Database(e),
        }
    }
}
