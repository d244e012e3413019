//! Assign a developer to a certificate
//!
//! Any existing user can be assigned, whether or not they asked for the
//! certificate. Assignment closes the list of desired developers.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::{
        fetch_record_for_update, fetch_tags, CertificateRecord, CertificateResponse,
        CertificateStatus, CERTIFICATE_COLUMNS,
    },
    users::model::user_exists,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignDeveloperCommand {
    pub certificate_id: i64,
    pub developer_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AssignDeveloperError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("User with id = {0} doesn't exist")]
    UserNotFound(i64),

    #[error("Cannot assign a developer to certificate with status INACTIVE")]
    Inactive,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CertificateResponse, AssignDeveloperError>> for AssignDeveloperCommand {}

impl crate::cqrs::middleware::Command for AssignDeveloperCommand {}

#[tracing::instrument(
    skip(pool),
    fields(certificate_id = command.certificate_id, developer_id = command.developer_id)
)]
pub async fn handle(
    pool: PgPool,
    command: AssignDeveloperCommand,
) -> Result<CertificateResponse, AssignDeveloperError> {
    let mut tx = pool.begin().await?;

    let certificate = fetch_record_for_update(&mut tx, command.certificate_id)
        .await?
        .ok_or(AssignDeveloperError::NotFound(command.certificate_id))?;

    if certificate.status == CertificateStatus::Inactive {
        return Err(AssignDeveloperError::Inactive);
    }
    if !user_exists(&mut tx, command.developer_id).await? {
        return Err(AssignDeveloperError::UserNotFound(command.developer_id));
    }

    let record = sqlx::query_as::<_, CertificateRecord>(&format!(
        r#"
        UPDATE certificates
        SET developer_id = $2, modification_date = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        CERTIFICATE_COLUMNS
    ))
    .bind(certificate.id)
    .bind(command.developer_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM certificate_desired_developers WHERE certificate_id = $1")
        .bind(certificate.id)
        .execute(&mut *tx)
        .await?;

    let tags = fetch_tags(&mut tx, certificate.id).await?;

    tx.commit().await?;

    tracing::info!(
        certificate_id = certificate.id,
        developer_id = command.developer_id,
        previous_developer_id = ?certificate.developer_id,
        "Developer assigned"
    );

    Ok(CertificateResponse::from_record(record, tags))
}
