//! Request to develop a certificate
//!
//! A user puts themselves on a certificate's list of desired developers. The
//! list stays open until the certificate is retired or a developer has been
//! assigned.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::{fetch_record_for_update, CertificateStatus},
    shared::error_helpers::map_unique_violation,
    users::model::user_exists,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDesiredDeveloperCommand {
    pub certificate_id: i64,
    pub developer_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDesiredDeveloperResponse {
    pub certificate_id: i64,
    pub developer_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AddDesiredDeveloperError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("User with id = {0} doesn't exist")]
    UserNotFound(i64),

    #[error("Cannot request certificate with status INACTIVE")]
    Inactive,

    #[error("Certificate with id = {0} already has a developer")]
    DeveloperAssigned(i64),

    #[error("User with id = {developer_id} already requested certificate with id = {certificate_id}")]
    AlreadyRequested {
        certificate_id: i64,
        developer_id: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AddDesiredDeveloperResponse, AddDesiredDeveloperError>>
    for AddDesiredDeveloperCommand
{
}

impl crate::cqrs::middleware::Command for AddDesiredDeveloperCommand {}

#[tracing::instrument(
    skip(pool),
    fields(certificate_id = command.certificate_id, developer_id = command.developer_id)
)]
pub async fn handle(
    pool: PgPool,
    command: AddDesiredDeveloperCommand,
) -> Result<AddDesiredDeveloperResponse, AddDesiredDeveloperError> {
    let mut tx = pool.begin().await?;

    let certificate = fetch_record_for_update(&mut tx, command.certificate_id)
        .await?
        .ok_or(AddDesiredDeveloperError::NotFound(command.certificate_id))?;

    if certificate.status == CertificateStatus::Inactive {
        return Err(AddDesiredDeveloperError::Inactive);
    }
    if certificate.developer_id.is_some() {
        return Err(AddDesiredDeveloperError::DeveloperAssigned(certificate.id));
    }
    if !user_exists(&mut tx, command.developer_id).await? {
        return Err(AddDesiredDeveloperError::UserNotFound(command.developer_id));
    }

    sqlx::query(
        "INSERT INTO certificate_desired_developers (certificate_id, user_id) VALUES ($1, $2)",
    )
    .bind(command.certificate_id)
    .bind(command.developer_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            AddDesiredDeveloperError::AlreadyRequested {
                certificate_id: command.certificate_id,
                developer_id: command.developer_id,
            },
            AddDesiredDeveloperError::Database,
        )
    })?;

    tx.commit().await?;

    tracing::info!("Developer requested certificate");

    Ok(AddDesiredDeveloperResponse {
        certificate_id: command.certificate_id,
        developer_id: command.developer_id,
    })
}
