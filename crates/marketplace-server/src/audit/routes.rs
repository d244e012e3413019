//! Audit trail API
//!
//! - `GET /api/v1/audit?user_id=&action=&resource_type=&resource_id=&limit=&offset=` (admin)

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use sqlx::PgPool;

use super::{models::AuditQuery, queries::query_audit_logs};
use crate::{api::response::ApiResponse, auth::AdminUser, error::ApiResult};

pub fn audit_routes() -> Router<PgPool> {
    Router::new().route("/", get(list_audit_logs))
}

/// Query the audit trail, newest first
///
/// # Response
///
/// - `200 OK` - Matching entries
/// - `400 Bad Request` - Unknown action or resource type
/// - `403 Forbidden` - Caller is not an admin
#[tracing::instrument(skip(pool, _admin))]
async fn list_audit_logs(
    State(pool): State<PgPool>,
    _admin: AdminUser,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Response> {
    let entries = query_audit_logs(&pool, query).await?;

    Ok(ApiResponse::success(entries).into_response())
}
