//! User API routes
//!
//! # Route Structure
//!
//! - `GET /api/v1/users` - List users (admin)
//! - `GET /api/v1/users/me` - The caller's own account
//! - `GET /api/v1/users/:id` - Get a user (admin or self)
//! - `PUT /api/v1/users/:id` - Update a user (admin or self)
//! - `DELETE /api/v1/users/:id` - Delete a user (admin)
//!
//! Order routes under `/users/me/orders` and `/users/:id/orders` are merged in
//! from the orders feature.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::{
    commands::{
        CreateUserError, DeleteUserCommand, DeleteUserError, UpdateUserCommand, UpdateUserError,
    },
    queries::{GetUserError, GetUserQuery, ListUsersError, ListUsersQuery},
};
use crate::{
    api::response::ApiResponse,
    auth::{AdminUser, AuthUser},
    error::{ApiResult, AppError},
    features::shared::pagination::PageLinks,
};

// ============================================================================
// Router Configuration
// ============================================================================

pub fn users_routes() -> Router<PgPool> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_me))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub(crate) fn ensure_self_or_admin(caller: &AuthUser, user_id: i64) -> Result<(), AppError> {
    if caller.is_self_or_admin(user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Access to user with id = {} is forbidden",
            user_id
        )))
    }
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Update a user
///
/// # Endpoint
///
/// `PUT /api/v1/users/:id`
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "John",
///   "last_name": "Doe",
///   "login": "john.doe",
///   "password": "newpass1",
///   "skills": ["rust", "sql"]
/// }
/// ```
///
/// # Response
///
/// - `200 OK` - User updated
/// - `400 Bad Request` - Validation error
/// - `403 Forbidden` - Caller is neither the user nor an admin
/// - `404 Not Found` - User not found
/// - `409 Conflict` - Login already taken
#[tracing::instrument(skip(pool, caller, command), fields(user_id = id))]
async fn update_user(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path(id): Path<i64>,
    Json(mut command): Json<UpdateUserCommand>,
) -> ApiResult<Response> {
    ensure_self_or_admin(&caller, id)?;
    command.id = id;

    let response = super::commands::update::handle(pool, command).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Delete a user
///
/// # Endpoint
///
/// `DELETE /api/v1/users/:id`
#[tracing::instrument(skip(pool, _admin), fields(user_id = id))]
async fn delete_user(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let response = super::commands::delete::handle(pool, DeleteUserCommand { id }).await?;

    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List users
///
/// # Endpoint
///
/// `GET /api/v1/users?page=1&per_page=50`
#[tracing::instrument(skip(pool, _admin, uri, query))]
async fn list_users(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Response> {
    let page = super::queries::list::handle(pool, query).await?;

    let links = PageLinks::build(uri.path(), &[], &page.pagination);
    Ok(ApiResponse::paged(page, links).into_response())
}

/// The caller's own account
///
/// # Endpoint
///
/// `GET /api/v1/users/me`
#[tracing::instrument(skip(pool, caller))]
async fn get_me(State(pool): State<PgPool>, caller: AuthUser) -> ApiResult<Response> {
    let response = super::queries::get::handle(pool, GetUserQuery { id: caller.user_id() }).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Get a user
///
/// # Endpoint
///
/// `GET /api/v1/users/:id`
///
/// # Response
///
/// - `200 OK` - User with skills
/// - `403 Forbidden` - Caller is neither the user nor an admin
/// - `404 Not Found` - User not found
#[tracing::instrument(skip(pool, caller), fields(user_id = id))]
async fn get_user(
    State(pool): State<PgPool>,
    caller: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    ensure_self_or_admin(&caller, id)?;

    let response = super::queries::get::handle(pool, GetUserQuery { id }).await?;

    Ok(ApiResponse::success(response).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateUserError> for AppError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            CreateUserError::DuplicateLogin(_) => AppError::Conflict(err.to_string()),
            CreateUserError::Password(_) => AppError::Internal(err.to_string()),
            CreateUserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateUserError> for AppError {
    fn from(err: UpdateUserError) -> Self {
        match err {
            UpdateUserError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateUserError::Validation(_) => AppError::InvalidArgument(err.to_string()),
            UpdateUserError::DuplicateLogin(_) => AppError::Conflict(err.to_string()),
            UpdateUserError::Password(_) => AppError::Internal(err.to_string()),
            UpdateUserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteUserError> for AppError {
    fn from(err: DeleteUserError) -> Self {
        match err {
            DeleteUserError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteUserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetUserError> for AppError {
    fn from(err: GetUserError) -> Self {
        match err {
            GetUserError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetUserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListUsersError> for AppError {
    fn from(err: ListUsersError) -> Self {
        match err {
            ListUsersError::Pagination(_) => AppError::InvalidArgument(err.to_string()),
            ListUsersError::Database(e) => AppError::Database(e),
        }
    }
}
