use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    routing::post,
    Extension, Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use super::middleware::AuditLayer;
use super::models::AuditEntry;
use crate::auth::{JwtConfig, Role};

const SECRET: &str = "audit-test-secret-with-enough-bytes-0123";

async fn created_handler(Json(payload): Json<serde_json::Value>) -> impl axum::response::IntoResponse {
    (StatusCode::CREATED, Json(json!({ "data": payload })))
}

async fn ok_handler() -> impl axum::response::IntoResponse {
    (StatusCode::OK, Json(json!({ "deleted": true })))
}

async fn conflict_handler() -> impl axum::response::IntoResponse {
    (StatusCode::CONFLICT, Json(json!({ "success": false })))
}

fn test_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/v1/certificates", post(created_handler).get(ok_handler))
        .route("/api/v1/certificates/:id", axum::routing::delete(ok_handler))
        .route("/api/v1/auth/signup", post(created_handler))
        .route("/api/v1/tags", post(conflict_handler))
        .layer(AuditLayer::new(pool))
        .layer(Extension(JwtConfig::new(SECRET, 5)))
}

/// The audit write is spawned, so poll until it lands
async fn wait_for_entries(pool: &PgPool, expected: i64) -> sqlx::Result<Vec<AuditEntry>> {
    for _ in 0..20 {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(pool)
            .await?;
        if count >= expected {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }

    sqlx::query_as::<_, AuditEntry>(
        r#"
        SELECT id, user_id, action, resource_type, resource_id,
               changes, ip_address, user_agent, timestamp, metadata
        FROM audit_log
        ORDER BY timestamp
        "#,
    )
    .fetch_all(pool)
    .await
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_post_records_caller(pool: PgPool) -> sqlx::Result<()> {
    let token = JwtConfig::new(SECRET, 5)
        .issue(7, "admin", Role::Admin)
        .unwrap()
        .token;

    let response = test_router(pool.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/certificates")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::from(r#"{"name":"Spa weekend"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let entries = wait_for_entries(&pool, 1).await?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "create");
    assert_eq!(entries[0].resource_type, "certificate");
    assert_eq!(entries[0].user_id, Some(7));
    assert_eq!(entries[0].changes, Some(json!({"name": "Spa weekend"})));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_records_resource_id(pool: PgPool) -> sqlx::Result<()> {
    let response = test_router(pool.clone())
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/v1/certificates/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let entries = wait_for_entries(&pool, 1).await?;
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].resource_id, Some(42));
    assert_eq!(entries[0].user_id, None);
    assert!(entries[0].changes.is_none());
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_signup_password_is_redacted(pool: PgPool) -> sqlx::Result<()> {
    let response = test_router(pool.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/auth/signup")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"login":"john.doe","password":"secret1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let entries = wait_for_entries(&pool, 1).await?;
    assert_eq!(entries[0].action, "signup");
    let changes = entries[0].changes.as_ref().unwrap();
    assert_eq!(changes["login"], "john.doe");
    assert_ne!(changes["password"], "secret1");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_reads_and_failures_are_not_audited(pool: PgPool) -> sqlx::Result<()> {
    let app = test_router(pool.clone());

    let read = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/v1/certificates")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::OK);

    let failed = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/tags")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"spa"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(failed.status(), StatusCode::CONFLICT);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 0);
    Ok(())
}
