//! Delete certificate command
//!
//! Tag links and reviews are removed with the certificate. A certificate that
//! appears in an order cannot be deleted.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::shared::error_helpers::map_foreign_key_violation;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCertificateCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCertificateResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCertificateError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Certificate with id = {0} is part of an order and cannot be deleted")]
    Ordered(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteCertificateResponse, DeleteCertificateError>>
    for DeleteCertificateCommand
{
}

impl crate::cqrs::middleware::Command for DeleteCertificateCommand {}

#[tracing::instrument(skip(pool), fields(certificate_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteCertificateCommand,
) -> Result<DeleteCertificateResponse, DeleteCertificateError> {
    let result = sqlx::query("DELETE FROM certificates WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(
                e,
                DeleteCertificateError::Ordered(command.id),
                DeleteCertificateError::Database,
            )
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteCertificateError::NotFound(command.id));
    }

    tracing::info!(certificate_id = command.id, "Certificate deleted");

    Ok(DeleteCertificateResponse {
        id: command.id,
        deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{create_test_user, TestCertificate};

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_deletes_certificate_and_links(pool: PgPool) -> sqlx::Result<()> {
        let certificate = TestCertificate::new("Spa weekend")
            .with_tags(&["spa"])
            .insert(&pool)
            .await?;

        let response = handle(pool.clone(), DeleteCertificateCommand { id: certificate.id })
            .await
            .unwrap();
        assert!(response.deleted);

        let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM certificate_tags")
            .fetch_one(&pool)
            .await?;
        assert_eq!(links, 0);

        // the tag itself stays
        let tags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&pool)
            .await?;
        assert_eq!(tags, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_not_found(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(pool, DeleteCertificateCommand { id: 42 }).await;
        assert!(matches!(result, Err(DeleteCertificateError::NotFound(42))));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_ordered_certificate(pool: PgPool) -> sqlx::Result<()> {
        let certificate = TestCertificate::new("Spa weekend")
            .with_status("ACTIVE")
            .insert(&pool)
            .await?;
        let user_id = create_test_user(&pool, "john.doe").await?;

        let order_id: i64 =
            sqlx::query_scalar("INSERT INTO orders (user_id, total_price) VALUES ($1, 10) RETURNING id")
                .bind(user_id)
                .fetch_one(&pool)
                .await?;
        sqlx::query("INSERT INTO order_certificates (order_id, certificate_id, price) VALUES ($1, $2, 10)")
            .bind(order_id)
            .bind(certificate.id)
            .execute(&pool)
            .await?;

        let result = handle(pool, DeleteCertificateCommand { id: certificate.id }).await;
        assert!(matches!(result, Err(DeleteCertificateError::Ordered(_))));
        Ok(())
    }
}
