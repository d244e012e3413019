//! Signup and login
//!
//! Credential checks live here; token signing and verification live in
//! [`crate::auth`].

pub mod commands;
pub mod routes;

pub use commands::{AuthenticatedUser, LoginCommand};
pub use routes::auth_routes;
