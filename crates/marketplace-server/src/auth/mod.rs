//! Authentication and authorization
//!
//! JWT bearer tokens with two roles (`USER`, `ADMIN`).
//!
//! # Components
//!
//! - [`Claims`]: JWT payload
//! - [`Role`]: user role
//! - [`AuthUser`] / [`AdminUser`]: axum extractors for protected routes
//! - [`hash_password`] / [`verify_password`]: Argon2 password hashing
//!
//! ```rust,ignore
//! async fn create_certificate(
//!     AdminUser(claims): AdminUser,
//!     Json(command): Json<CreateCertificateCommand>,
//! ) -> ApiResult<Response> {
//!     // ...
//! }
//! ```

mod jwt;
mod middleware;
mod password;
mod roles;

pub use jwt::{create_token, decode_token, Claims, JwtConfig, JwtError, TokenResponse};
pub use middleware::{claims_from_parts, AdminUser, AuthError, AuthUser};
pub use password::{hash_password, verify_password, PasswordError};
pub use roles::{ParseRoleError, Role};
