//! Credential check for login
//!
//! Unknown logins and wrong passwords fail the same way so that callers cannot
//! probe which logins exist. Token issuing happens at the route.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    auth::{verify_password, PasswordError, Role},
    features::users::model::fetch_user_by_login,
};

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginCommand")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity of a user whose credentials checked out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub login: String,
    pub role: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AuthenticatedUser, LoginError>> for LoginCommand {}

impl crate::cqrs::middleware::Command for LoginCommand {}

#[tracing::instrument(skip(pool, command), fields(login = %command.login))]
pub async fn handle(
    pool: PgPool,
    command: LoginCommand,
) -> Result<AuthenticatedUser, LoginError> {
    let mut conn = pool.acquire().await?;

    let user = fetch_user_by_login(&mut conn, &command.login)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    verify_password(&command.password, &user.password_hash).map_err(|e| {
        if matches!(e, PasswordError::InvalidHashFormat) {
            tracing::warn!(user_id = user.id, "Stored password hash is not a valid PHC string");
        }
        LoginError::InvalidCredentials
    })?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(AuthenticatedUser {
        id: user.id,
        login: user.login,
        role: user.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::hash_password, features::shared::test_helpers::TestUser};

    fn command(login: &str, password: &str) -> LoginCommand {
        LoginCommand {
            login: login.to_string(),
            password: password.to_string(),
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_login(pool: PgPool) -> sqlx::Result<()> {
        let hash = hash_password("secret1").unwrap();
        let user = TestUser::new("john.doe")
            .admin()
            .with_password_hash(&hash)
            .insert(&pool)
            .await?;

        let ok = handle(pool.clone(), command("john.doe", "secret1")).await.unwrap();
        assert_eq!(ok.id, user.id);
        assert_eq!(ok.role, Role::Admin);

        let wrong = handle(pool.clone(), command("john.doe", "secret2")).await;
        assert!(matches!(wrong, Err(LoginError::InvalidCredentials)));

        let unknown = handle(pool, command("nobody", "secret1")).await;
        assert!(matches!(unknown, Err(LoginError::InvalidCredentials)));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_login_with_corrupt_hash(pool: PgPool) -> sqlx::Result<()> {
        TestUser::new("john.doe").insert(&pool).await?;

        let result = handle(pool, command("john.doe", "secret1")).await;
        assert!(matches!(result, Err(LoginError::InvalidCredentials)));
        Ok(())
    }
}
