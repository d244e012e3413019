//! Remove the assigned developer from a certificate

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::certificates::model::{
    fetch_record_for_update, fetch_tags, CertificateRecord, CertificateResponse,
    CERTIFICATE_COLUMNS,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnassignDeveloperCommand {
    pub certificate_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum UnassignDeveloperError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Certificate with id = {0} has no assigned developer")]
    NoDeveloper(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CertificateResponse, UnassignDeveloperError>> for UnassignDeveloperCommand {}

impl crate::cqrs::middleware::Command for UnassignDeveloperCommand {}

#[tracing::instrument(skip(pool), fields(certificate_id = command.certificate_id))]
pub async fn handle(
    pool: PgPool,
    command: UnassignDeveloperCommand,
) -> Result<CertificateResponse, UnassignDeveloperError> {
    let mut tx = pool.begin().await?;

    let certificate = fetch_record_for_update(&mut tx, command.certificate_id)
        .await?
        .ok_or(UnassignDeveloperError::NotFound(command.certificate_id))?;
    let Some(previous) = certificate.developer_id else {
        return Err(UnassignDeveloperError::NoDeveloper(certificate.id));
    };

    let record = sqlx::query_as::<_, CertificateRecord>(&format!(
        r#"
        UPDATE certificates
        SET developer_id = NULL, modification_date = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        CERTIFICATE_COLUMNS
    ))
    .bind(certificate.id)
    .fetch_one(&mut *tx)
    .await?;

    let tags = fetch_tags(&mut tx, certificate.id).await?;

    tx.commit().await?;

    tracing::info!(certificate_id = certificate.id, developer_id = previous, "Developer unassigned");

    Ok(CertificateResponse::from_record(record, tags))
}
