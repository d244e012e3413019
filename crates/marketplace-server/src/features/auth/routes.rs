//! Authentication routes
//!
//! - `POST /api/v1/auth/signup` - Create a USER account and return a token
//! - `POST /api/v1/auth/login` - Exchange credentials for a token

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;

use super::commands::{LoginCommand, LoginError};
use crate::{
    api::response::{created, ApiResponse},
    auth::{JwtConfig, JwtError, TokenResponse},
    error::{ApiResult, AppError},
    features::users::{commands::CreateUserCommand, model::UserResponse},
};

// ============================================================================
// Router Configuration
// ============================================================================

pub fn auth_routes() -> Router<PgPool> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Signup result: the new account plus its first token
#[derive(Debug, Serialize)]
struct SignupResponse {
    user: UserResponse,
    #[serde(flatten)]
    token: TokenResponse,
}

/// Create an account
///
/// # Endpoint
///
/// `POST /api/v1/auth/signup`
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "John",
///   "last_name": "Doe",
///   "login": "john.doe",
///   "password": "secret1",
///   "skills": ["rust"]
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - `{ user, token, token_type, expires_in }`
/// - `400 Bad Request` - Validation error
/// - `409 Conflict` - Login already taken
#[tracing::instrument(skip(pool, jwt, command), fields(login = %command.login))]
async fn signup(
    State(pool): State<PgPool>,
    Extension(jwt): Extension<JwtConfig>,
    Json(command): Json<CreateUserCommand>,
) -> ApiResult<Response> {
    let user = crate::features::users::commands::create::handle(pool, command).await?;
    let token = jwt.issue(user.id, &user.login, user.role)?;

    Ok(created(SignupResponse { user, token }))
}

/// Log in
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Response
///
/// - `200 OK` - `{ token, token_type: "Bearer", expires_in }`
/// - `401 Unauthorized` - Invalid login or password
#[tracing::instrument(skip(pool, jwt, command), fields(login = %command.login))]
async fn login(
    State(pool): State<PgPool>,
    Extension(jwt): Extension<JwtConfig>,
    Json(command): Json<LoginCommand>,
) -> ApiResult<Response> {
    let user = super::commands::login::handle(pool, command).await?;
    let token = jwt.issue(user.id, &user.login, user.role)?;

    Ok(ApiResponse::success(token).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            LoginError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        AppError::Internal(err.to_string())
    }
}
