//! Delete user command
//!
//! The user's orders, reviews and skills go with the account.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserCommand {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    pub id: i64,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error("User with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteUserResponse, DeleteUserError>> for DeleteUserCommand {}

impl crate::cqrs::middleware::Command for DeleteUserCommand {}

#[tracing::instrument(skip(pool), fields(user_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteUserCommand,
) -> Result<DeleteUserResponse, DeleteUserError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteUserError::NotFound(command.id));
    }

    tracing::info!(user_id = command.id, "User deleted");

    Ok(DeleteUserResponse {
        id: command.id,
        deleted: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::create_test_user;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle(pool: PgPool) -> sqlx::Result<()> {
        let id = create_test_user(&pool, "john.doe").await?;

        assert!(handle(pool.clone(), DeleteUserCommand { id }).await.unwrap().deleted);

        let again = handle(pool, DeleteUserCommand { id }).await;
        assert!(matches!(again, Err(DeleteUserError::NotFound(_))));
        Ok(())
    }
}
