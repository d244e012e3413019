//! Withdraw a request to develop a certificate

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::certificates::model::fetch_record;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveDesiredDeveloperCommand {
    pub certificate_id: i64,
    pub developer_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveDesiredDeveloperResponse {
    pub certificate_id: i64,
    pub developer_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveDesiredDeveloperError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("User with id = {developer_id} has not requested certificate with id = {certificate_id}")]
    NotRequested {
        certificate_id: i64,
        developer_id: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<RemoveDesiredDeveloperResponse, RemoveDesiredDeveloperError>>
    for RemoveDesiredDeveloperCommand
{
}

impl crate::cqrs::middleware::Command for RemoveDesiredDeveloperCommand {}

#[tracing::instrument(
    skip(pool),
    fields(certificate_id = command.certificate_id, developer_id = command.developer_id)
)]
pub async fn handle(
    pool: PgPool,
    command: RemoveDesiredDeveloperCommand,
) -> Result<RemoveDesiredDeveloperResponse, RemoveDesiredDeveloperError> {
    let mut tx = pool.begin().await?;

    if fetch_record(&mut tx, command.certificate_id).await?.is_none() {
        return Err(RemoveDesiredDeveloperError::NotFound(command.certificate_id));
    }

    let result = sqlx::query(
        "DELETE FROM certificate_desired_developers WHERE certificate_id = $1 AND user_id = $2",
    )
    .bind(command.certificate_id)
    .bind(command.developer_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RemoveDesiredDeveloperError::NotRequested {
            certificate_id: command.certificate_id,
            developer_id: command.developer_id,
        });
    }

    tx.commit().await?;

    tracing::info!("Developer request withdrawn");

    Ok(RemoveDesiredDeveloperResponse {
        certificate_id: command.certificate_id,
        developer_id: command.developer_id,
    })
}
