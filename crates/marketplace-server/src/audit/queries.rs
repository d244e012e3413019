//! Database queries for audit logs

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::models::{AuditEntry, AuditQuery, CreateAuditEntry};

/// Insert an audit record and return it with its generated id and timestamp
pub async fn create_audit_entry(
    pool: &PgPool,
    entry: CreateAuditEntry,
) -> Result<AuditEntry, sqlx::Error> {
    let record = sqlx::query_as::<_, AuditEntry>(
        r#"
        INSERT INTO audit_log (
            user_id, action, resource_type, resource_id,
            changes, ip_address, user_agent, metadata
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, action, resource_type, resource_id,
                  changes, ip_address, user_agent, timestamp, metadata
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.action.as_str())
    .bind(entry.resource_type.as_str())
    .bind(entry.resource_id)
    .bind(&entry.changes)
    .bind(&entry.ip_address)
    .bind(&entry.user_agent)
    .bind(&entry.metadata)
    .fetch_one(pool)
    .await?;

    debug!(
        audit_id = %record.id,
        action = %entry.action,
        resource_type = %entry.resource_type,
        "Created audit log entry"
    );

    Ok(record)
}

/// Query audit logs with filters, newest first
pub async fn query_audit_logs(
    pool: &PgPool,
    query: AuditQuery,
) -> Result<Vec<AuditEntry>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        SELECT id, user_id, action, resource_type, resource_id,
               changes, ip_address, user_agent, timestamp, metadata
        FROM audit_log
        WHERE TRUE
        "#,
    );

    if let Some(user_id) = query.user_id {
        builder.push(" AND user_id = ").push_bind(user_id);
    }
    if let Some(action) = query.action {
        builder.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(resource_type) = query.resource_type {
        builder.push(" AND resource_type = ").push_bind(resource_type.as_str());
    }
    if let Some(resource_id) = query.resource_id {
        builder.push(" AND resource_id = ").push_bind(resource_id);
    }
    if let Some(start_time) = query.start_time {
        builder.push(" AND timestamp >= ").push_bind(start_time);
    }
    if let Some(end_time) = query.end_time {
        builder.push(" AND timestamp <= ").push_bind(end_time);
    }

    builder
        .push(" ORDER BY timestamp DESC LIMIT ")
        .push_bind(query.effective_limit())
        .push(" OFFSET ")
        .push_bind(query.offset.max(0));

    let records = builder.build_query_as::<AuditEntry>().fetch_all(pool).await?;

    debug!(count = records.len(), "Queried audit logs");

    Ok(records)
}
