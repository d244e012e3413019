use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    shared::{
        error_helpers::map_unique_violation,
        validation::{validate_text, FieldValidationError},
    },
    tags::model::{Tag, TAG_NAME_MAX, TAG_NAME_MIN},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagCommand {
    pub name: String,
}

pub type CreateTagResponse = Tag;

#[derive(Debug, thiserror::Error)]
pub enum CreateTagError {
    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error("Tag with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateTagResponse, CreateTagError>> for CreateTagCommand {}

impl crate::cqrs::middleware::Command for CreateTagCommand {}

impl CreateTagCommand {
    pub fn validate(&self) -> Result<(), CreateTagError> {
        validate_text("name", &self.name, TAG_NAME_MIN, TAG_NAME_MAX)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateTagCommand,
) -> Result<CreateTagResponse, CreateTagError> {
    command.validate()?;
    let name = command.name.trim().to_string();

    let tag = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
        .bind(&name)
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                CreateTagError::DuplicateName(name.clone()),
                CreateTagError::Database,
            )
        })?;

    tracing::info!(tag_id = tag.id, "Tag created");

    Ok(tag)
}
