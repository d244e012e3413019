//! Audit logging middleware for tracking commands
//!
//! - Only commands (POST, PUT, PATCH, DELETE) are audited
//! - The request body is captured with password fields redacted
//! - The caller is read from the bearer token when one is present
//! - Entries are written only after a successful (2xx) response

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, Request},
    http::{Method, Uri},
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, error, info, warn};

use super::models::{AuditAction, CreateAuditEntry, ResourceType};
use super::queries::create_audit_entry;
use crate::auth::claims_from_parts;

const REDACTED: &str = "[REDACTED]";

/// Audit logging layer
///
/// Needs the `JwtConfig` extension to be installed by an outer layer so the
/// caller can be identified.
#[derive(Clone)]
pub struct AuditLayer {
    pool: PgPool,
}

impl AuditLayer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            pool: self.pool.clone(),
        }
    }
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    pool: PgPool,
}

impl<S> Service<Request> for AuditMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            let method = request.method().clone();
            let uri = request.uri().clone();

            let should_audit =
                matches!(method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE);
            if !should_audit {
                return inner.call(request).await;
            }

            let ip_address = request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string());

            let user_agent = request
                .headers()
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            let (parts, body) = request.into_parts();

            let user_id = claims_from_parts(&parts)
                .ok()
                .and_then(|claims| claims.user_id().ok());

            let body_bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(e) => {
                    warn!(method = %method, uri = %uri, error = %e, "Failed to capture request body");
                    Bytes::new()
                },
            };

            debug!(
                method = %method,
                uri = %uri,
                user_id = ?user_id,
                body_size = body_bytes.len(),
                "Auditable command received"
            );

            let request = Request::from_parts(parts, Body::from(body_bytes.clone()));
            let response = inner.call(request).await?;

            if !response.status().is_success() {
                warn!(
                    method = %method,
                    uri = %uri,
                    status = %response.status(),
                    "Command failed, not audited"
                );
                return Ok(response);
            }

            let action = infer_action(&method, &uri);
            let (resource_type, resource_id) = infer_resource(&uri);

            let changes = if body_bytes.is_empty() {
                None
            } else {
                serde_json::from_slice::<JsonValue>(&body_bytes)
                    .ok()
                    .map(redact_secrets)
            };

            let metadata = serde_json::json!({
                "method": method.to_string(),
                "uri": uri.to_string(),
                "status": response.status().as_u16(),
            });

            let entry = CreateAuditEntry {
                user_id,
                resource_id,
                changes,
                metadata: Some(metadata),
                ip_address,
                user_agent,
                ..CreateAuditEntry::new(action, resource_type)
            };

            // The response is not held back by the audit write
            tokio::spawn(async move {
                match create_audit_entry(&pool, entry).await {
                    Ok(entry) => {
                        info!(
                            audit_id = %entry.id,
                            action = %entry.action,
                            resource_type = %entry.resource_type,
                            "Audit log entry created"
                        );
                    },
                    Err(e) => {
                        error!(error = %e, "Failed to create audit log entry");
                    },
                }
            });

            Ok(response)
        })
    }
}

/// Replace the value of every `password` key, at any depth
pub(crate) fn redact_secrets(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => JsonValue::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if key.to_ascii_lowercase().contains("password") {
                        (key, JsonValue::String(REDACTED.to_string()))
                    } else {
                        (key, redact_secrets(value))
                    }
                })
                .collect(),
        ),
        JsonValue::Array(items) => JsonValue::Array(items.into_iter().map(redact_secrets).collect()),
        other => other,
    }
}

/// Path segments after the `/api/v1` prefix
fn api_segments(uri: &Uri) -> Vec<&str> {
    let path = uri.path();
    let path = path.strip_prefix("/api/v1").unwrap_or(path);
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Infer audit action from HTTP method and URI
fn infer_action(method: &Method, uri: &Uri) -> AuditAction {
    match *method {
        Method::POST => match api_segments(uri).as_slice() {
            ["auth", "login"] => AuditAction::Login,
            ["auth", "signup"] => AuditAction::Signup,
            _ => AuditAction::Create,
        },
        Method::PUT | Method::PATCH => AuditAction::Update,
        Method::DELETE => AuditAction::Delete,
        _ => AuditAction::Other,
    }
}

/// Infer resource type and id from URI
///
/// Nested orders and reviews are their own resource; nested certificate tags
/// change the certificate.
fn infer_resource(uri: &Uri) -> (ResourceType, Option<i64>) {
    let segments = api_segments(uri);
    let id = segments.get(1).and_then(|s| s.parse::<i64>().ok());

    match segments.as_slice() {
        [_, _, "orders", order_id, ..] => (ResourceType::Order, order_id.parse().ok()),
        [_, _, "orders"] => (ResourceType::Order, None),
        [_, _, "reviews", ..] => (ResourceType::Review, None),
        ["certificates" | "items", ..] => (ResourceType::Certificate, id),
        ["tags", ..] => (ResourceType::Tag, id),
        ["users", ..] | ["auth", ..] => (ResourceType::User, id),
        _ => (ResourceType::Other, id),
    }
}
