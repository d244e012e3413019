use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::tags::Tag;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTagQuery {
    pub id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetTagError {
    #[error("Tag with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Tag, GetTagError>> for GetTagQuery {}

impl crate::cqrs::middleware::Query for GetTagQuery {}

#[tracing::instrument(skip(pool), fields(tag_id = query.id))]
pub async fn handle(pool: PgPool, query: GetTagQuery) -> Result<Tag, GetTagError> {
    sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetTagError::NotFound(query.id))
}
