//! Axum extractors for bearer-token authentication
//!
//! The signing secret is read from a [`JwtConfig`] request extension installed
//! by the router. A request without that extension is rejected as unauthenticated.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{Claims, JwtConfig, JwtError};
use crate::api::response::ErrorResponse;

/// Any caller holding a valid bearer token
///
/// ```rust,ignore
/// async fn my_orders(AuthUser(claims): AuthUser) -> impl IntoResponse {
///     format!("Hello, {}!", claims.login)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// A caller whose token carries the ADMIN role
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication token is required")]
    MissingToken,
    #[error("Authorization header must use the Bearer scheme")]
    InvalidAuthHeader,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Insufficient permission")]
    InsufficientPermission,
}

impl AuthError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            AuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::InsufficientPermission => {
                (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSION")
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        tracing::debug!(code, "Request rejected by authentication");
        (status, Json(ErrorResponse::new(code, self.to_string()))).into_response()
    }
}

/// Extract and verify the bearer token from request parts
pub fn claims_from_parts(parts: &Parts) -> Result<Claims, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let config = parts.extensions.get::<JwtConfig>().ok_or_else(|| {
        tracing::error!("JwtConfig extension is not installed");
        AuthError::InvalidToken
    })?;

    let claims = config.decode(token).map_err(|e| match e {
        JwtError::TokenExpired => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    // sub must be a numeric user id
    claims.user_id().map_err(|_| AuthError::InvalidToken)?;

    Ok(claims)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        claims_from_parts(parts).map(AuthUser)
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = claims_from_parts(parts)?;
        if !claims.is_admin() {
            return Err(AuthError::InsufficientPermission);
        }
        Ok(AdminUser(claims))
    }
}

impl AuthUser {
    /// Numeric id of the caller
    pub fn user_id(&self) -> i64 {
        // validated during extraction
        self.0.user_id().unwrap_or_default()
    }

    /// The caller is the given user or an administrator
    pub fn is_self_or_admin(&self, user_id: i64) -> bool {
        self.0.is_admin() || self.user_id() == user_id
    }
}

impl AdminUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id().unwrap_or_default()
    }
}
