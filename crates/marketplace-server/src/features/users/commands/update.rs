//! Update user command
//!
//! Replaces names, login and skills, and the password when one is supplied.
//! The role is never changed here.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    auth::{hash_password, PasswordError},
    features::{
        shared::{error_helpers::map_unique_violation, validation::FieldValidationError},
        tags::reconcile::dedupe_names,
        users::model::{fetch_user_for_update, set_skills, UserFields, UserRecord, UserResponse},
    },
};

#[derive(Clone, Serialize, Deserialize)]
pub struct UpdateUserCommand {
    #[serde(skip)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    /// New password; the stored one is kept when absent
    #[serde(default)]
    pub password: Option<String>,
    /// The complete desired skill set
    #[serde(default)]
    pub skills: Vec<String>,
}

impl std::fmt::Debug for UpdateUserCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserCommand")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("skills", &self.skills)
            .finish()
    }
}

pub type UpdateUserResponse = UserResponse;

#[derive(Debug, thiserror::Error)]
pub enum UpdateUserError {
    #[error("User with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error("User with login '{0}' already exists")]
    DuplicateLogin(String),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateUserResponse, UpdateUserError>> for UpdateUserCommand {}

impl crate::cqrs::middleware::Command for UpdateUserCommand {}

impl UpdateUserCommand {
    pub fn validate(&self) -> Result<(), UpdateUserError> {
        UserFields {
            first_name: &self.first_name,
            last_name: &self.last_name,
            login: &self.login,
            password: self.password.as_deref(),
            skills: &self.skills,
        }
        .validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateUserCommand,
) -> Result<UpdateUserResponse, UpdateUserError> {
    command.validate()?;

    let password_hash = command.password.as_deref().map(hash_password).transpose()?;
    let skills = dedupe_names(&command.skills);

    let mut tx = pool.begin().await?;

    fetch_user_for_update(&mut tx, command.id)
        .await?
        .ok_or(UpdateUserError::NotFound(command.id))?;

    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        UPDATE users
        SET first_name = $2,
            last_name = $3,
            login = $4,
            password_hash = COALESCE($5, password_hash)
        WHERE id = $1
        RETURNING id, first_name, last_name, login, password_hash, role, created_at
        "#,
    )
    .bind(command.id)
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(&command.login)
    .bind(&password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdateUserError::DuplicateLogin(command.login.clone()),
            UpdateUserError::Database,
        )
    })?;

    let skills = set_skills(&mut tx, record.id, &skills).await?;

    tx.commit().await?;

    tracing::info!(user_id = record.id, "User updated");

    Ok(UserResponse::from_record(record, skills))
}
