use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::users::model::{fetch_skills, fetch_user, UserResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserQuery {
    pub id: i64,
}

pub type GetUserResponse = UserResponse;

#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error("User with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<GetUserResponse, GetUserError>> for GetUserQuery {}

impl crate::cqrs::middleware::Query for GetUserQuery {}

#[tracing::instrument(skip(pool), fields(user_id = query.id))]
pub async fn handle(pool: PgPool, query: GetUserQuery) -> Result<GetUserResponse, GetUserError> {
    let mut conn = pool.acquire().await?;

    let record = fetch_user(&mut conn, query.id)
        .await?
        .ok_or(GetUserError::NotFound(query.id))?;
    let skills = fetch_skills(&mut conn, record.id).await?;

    Ok(UserResponse::from_record(record, skills))
}
