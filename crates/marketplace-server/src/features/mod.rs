//! Feature modules implementing the marketplace API
//!
//! Each feature is a vertical slice following the CQRS (Command Query
//! Responsibility Segregation) pattern with its own commands, queries and routes.
//!
//! # Features
//!
//! - **certificates**: Certificate catalogue, search, status lifecycle and tags
//! - **tags**: Tag management and the most-used tag report
//! - **users**: User accounts and skills
//! - **auth**: Sign-up and login
//! - **orders**: Certificate purchases, nested under users
//! - **reviews**: Certificate reviews, nested under certificates
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list, search)
//! - `routes.rs` - HTTP route definitions
//! - `model.rs` - Rows, response types and shared SQL helpers
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate.

pub mod auth;
pub mod certificates;
pub mod orders;
pub mod reviews;
pub mod shared;
pub mod tags;
pub mod users;

use axum::Router;
use sqlx::PgPool;

use crate::audit;

/// Creates the API router with all feature routes mounted
///
/// - `/certificates` - Certificates with their tags and reviews
/// - `/items` - Alias of `/certificates`
/// - `/tags` - Tags
/// - `/users` - Users with their orders and related certificates
/// - `/auth` - Sign-up and login
/// - `/audit` - Audit trail
pub fn router(pool: PgPool) -> Router<()> {
    let certificates = certificates::certificates_routes()
        .merge(reviews::reviews_routes())
        .with_state(pool.clone());

    Router::new()
        .nest("/certificates", certificates.clone())
        .nest("/items", certificates)
        .nest("/tags", tags::tags_routes().with_state(pool.clone()))
        .nest(
            "/users",
            users::users_routes()
                .merge(orders::orders_routes())
                .merge(certificates::user_certificates_routes())
                .with_state(pool.clone()),
        )
        .nest("/auth", auth::auth_routes().with_state(pool.clone()))
        .nest("/audit", audit::audit_routes().with_state(pool))
}
