//! Startup bootstrap of the administrator account
//!
//! Creates the configured ADMIN account when no user has that login, and
//! promotes an existing account with that login to ADMIN. Running it again
//! changes nothing; the stored password of an existing account is kept.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    auth::{hash_password, PasswordError, Role},
    features::{
        shared::validation::{validate_login, FieldValidationError},
        users::model::{fetch_user_by_login, validate_password, LOGIN_MAX, LOGIN_MIN},
    },
};

#[derive(Clone, Serialize, Deserialize)]
pub struct EnsureAdminCommand {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for EnsureAdminCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnsureAdminCommand")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsureAdminResponse {
    pub id: i64,
    pub created: bool,
    pub promoted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EnsureAdminError {
    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<EnsureAdminResponse, EnsureAdminError>> for EnsureAdminCommand {}

impl crate::cqrs::middleware::Command for EnsureAdminCommand {}

impl EnsureAdminCommand {
    pub fn validate(&self) -> Result<(), EnsureAdminError> {
        validate_login(&self.login, LOGIN_MIN, LOGIN_MAX)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(login = %command.login))]
pub async fn handle(
    pool: PgPool,
    command: EnsureAdminCommand,
) -> Result<EnsureAdminResponse, EnsureAdminError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    if let Some(existing) = fetch_user_by_login(&mut tx, &command.login).await? {
        let promoted = !existing.role.is_admin();
        if promoted {
            sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
                .bind(existing.id)
                .bind(Role::Admin)
                .execute(&mut *tx)
                .await?;
            tracing::warn!(user_id = existing.id, "Existing user promoted to ADMIN");
        }
        tx.commit().await?;

        return Ok(EnsureAdminResponse {
            id: existing.id,
            created: false,
            promoted,
        });
    }

    let password_hash = hash_password(&command.password)?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (first_name, last_name, login, password_hash, role)
        VALUES ('System', 'Administrator', $1, $2, $3)
        ON CONFLICT (login) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(&command.login)
    .bind(&password_hash)
    .bind(Role::Admin)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = id, "Administrator account created");

    Ok(EnsureAdminResponse {
        id,
        created: true,
        promoted: false,
    })
}
