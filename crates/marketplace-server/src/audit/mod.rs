//! Audit trail of write operations
//!
//! Commands (POST, PUT, PATCH, DELETE) are recorded by [`AuditLayer`] after they
//! succeed; reads are never audited. Password fields in captured request bodies
//! are redacted before they are stored.
//!
//! ```no_run
//! use axum::Router;
//! use sqlx::PgPool;
//! use marketplace_server::audit;
//!
//! # async fn example(pool: PgPool) {
//! let app: Router = Router::new().layer(audit::AuditLayer::new(pool.clone()));
//! # }
//! ```

mod middleware;
mod models;
mod queries;
mod routes;

#[cfg(test)]
mod middleware_tests;

pub use middleware::AuditLayer;
pub use models::{AuditAction, AuditEntry, AuditQuery, CreateAuditEntry, ResourceType};
pub use queries::{create_audit_entry, query_audit_logs};
pub use routes::audit_routes;
