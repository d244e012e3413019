//! Marketplace Server Library
//!
//! REST backend for a gift-certificate marketplace: certificates with a status
//! lifecycle and tags, users with skills, orders, reviews and an audit trail.
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** layout:
//!
//! - **Commands** (POST, PUT, PATCH, DELETE) modify state and are recorded in
//!   the `audit_log` table by [`audit::AuditLayer`]
//! - **Queries** (GET) only read state and are never audited
//!
//! Every feature under [`features`] owns its commands, queries and routes.
//! Handlers return feature-specific errors that the routes convert into
//! [`AppError`], the single place where error kinds become HTTP status codes.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extractors
//! - **SQLx**: PostgreSQL access with runtime-checked queries
//! - **Tower**: Middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use marketplace_server::{api, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let app = api::create_router(pool, &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;

pub use error::{ApiResult, AppError};
