//! Delete tag command
//!
//! Removing a tag also removes it from every certificate and user skill set.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTagCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTagResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteTagError {
    #[error("Tag with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteTagResponse, DeleteTagError>> for DeleteTagCommand {}

impl crate::cqrs::middleware::Command for DeleteTagCommand {}

#[tracing::instrument(skip(pool), fields(tag_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteTagCommand,
) -> Result<DeleteTagResponse, DeleteTagError> {
    let result = sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteTagError::NotFound(command.id));
    }

    tracing::info!(tag_id = command.id, "Tag deleted");

    Ok(DeleteTagResponse {
        id: command.id,
        deleted: true,
    })
}
