//! Detach a tag from a certificate
//!
//! Only `DRAFT` and `PUBLISHED` certificates may lose tags. The tag row itself
//! is kept.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::certificates::{
    guard::{check_tag_change, TransitionError},
    model::fetch_record_for_update,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveCertificateTagCommand {
    pub certificate_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveCertificateTagResponse {
    pub certificate_id: i64,
    pub tag_id: i64,
    pub removed: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveCertificateTagError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Certificate with id = {certificate_id} doesn't have tag with id = {tag_id}")]
    TagNotAttached { certificate_id: i64, tag_id: i64 },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<RemoveCertificateTagResponse, RemoveCertificateTagError>>
    for RemoveCertificateTagCommand
{
}

impl crate::cqrs::middleware::Command for RemoveCertificateTagCommand {}

#[tracing::instrument(skip(pool), fields(certificate_id = command.certificate_id, tag_id = command.tag_id))]
pub async fn handle(
    pool: PgPool,
    command: RemoveCertificateTagCommand,
) -> Result<RemoveCertificateTagResponse, RemoveCertificateTagError> {
    let mut tx = pool.begin().await?;

    let certificate = fetch_record_for_update(&mut tx, command.certificate_id)
        .await?
        .ok_or(RemoveCertificateTagError::NotFound(command.certificate_id))?;
    check_tag_change(certificate.status)?;

    let deleted = sqlx::query(
        "DELETE FROM certificate_tags WHERE certificate_id = $1 AND tag_id = $2",
    )
    .bind(command.certificate_id)
    .bind(command.tag_id)
    .execute(&mut *tx)
    .await?;

    if deleted.rows_affected() == 0 {
        return Err(RemoveCertificateTagError::TagNotAttached {
            certificate_id: command.certificate_id,
            tag_id: command.tag_id,
        });
    }

    sqlx::query("UPDATE certificates SET modification_date = NOW() WHERE id = $1")
        .bind(command.certificate_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!("Tag detached from certificate");

    Ok(RemoveCertificateTagResponse {
        certificate_id: command.certificate_id,
        tag_id: command.tag_id,
        removed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestCertificate;

    async fn tag_id(pool: &PgPool, name: &str) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT id FROM tags WHERE name = $1")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_detaches_tag(pool: PgPool) -> sqlx::Result<()> {
        let certificate = TestCertificate::new("Spa weekend")
            .with_tags(&["spa"])
            .insert(&pool)
            .await?;
        let spa = tag_id(&pool, "spa").await?;

        let command = RemoveCertificateTagCommand {
            certificate_id: certificate.id,
            tag_id: spa,
        };
        assert!(handle(pool.clone(), command.clone()).await.unwrap().removed);

        let again = handle(pool.clone(), command).await;
        assert!(matches!(again, Err(RemoveCertificateTagError::TagNotAttached { .. })));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_rejects_inactive_certificate(pool: PgPool) -> sqlx::Result<()> {
        let certificate = TestCertificate::new("Spa weekend")
            .with_status("INACTIVE")
            .with_tags(&["spa"])
            .insert(&pool)
            .await?;
        let spa = tag_id(&pool, "spa").await?;

        let result = handle(
            pool,
            RemoveCertificateTagCommand {
                certificate_id: certificate.id,
                tag_id: spa,
            },
        )
        .await;
        assert!(matches!(result, Err(RemoveCertificateTagError::Transition(_))));
        Ok(())
    }
}
