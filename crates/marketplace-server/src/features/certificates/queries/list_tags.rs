use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::{fetch_record, fetch_tags},
    tags::Tag,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCertificateTagsQuery {
    pub certificate_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ListCertificateTagsError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<Tag>, ListCertificateTagsError>> for ListCertificateTagsQuery {}

impl crate::cqrs::middleware::Query for ListCertificateTagsQuery {}

#[tracing::instrument(skip(pool), fields(certificate_id = query.certificate_id))]
pub async fn handle(
    pool: PgPool,
    query: ListCertificateTagsQuery,
) -> Result<Vec<Tag>, ListCertificateTagsError> {
    let mut conn = pool.acquire().await?;

    if fetch_record(&mut conn, query.certificate_id).await?.is_none() {
        return Err(ListCertificateTagsError::NotFound(query.certificate_id));
    }

    Ok(fetch_tags(&mut conn, query.certificate_id).await?)
}
