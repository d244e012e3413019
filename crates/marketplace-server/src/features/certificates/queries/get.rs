use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::certificates::model::{fetch_record, fetch_tags, CertificateResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCertificateQuery {
    pub id: i64,
}

pub type GetCertificateResponse = CertificateResponse;

#[derive(Debug, thiserror::Error)]
pub enum GetCertificateError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<GetCertificateResponse, GetCertificateError>> for GetCertificateQuery {}

impl crate::cqrs::middleware::Query for GetCertificateQuery {}

#[tracing::instrument(skip(pool), fields(certificate_id = query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetCertificateQuery,
) -> Result<GetCertificateResponse, GetCertificateError> {
    let mut conn = pool.acquire().await?;

    let record = fetch_record(&mut conn, query.id)
        .await?
        .ok_or(GetCertificateError::NotFound(query.id))?;
    let tags = fetch_tags(&mut conn, record.id).await?;

    Ok(CertificateResponse::from_record(record, tags))
}
