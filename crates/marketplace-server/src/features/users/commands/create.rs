//! Sign up a new user
//!
//! New accounts always get the `USER` role. The password is stored as an
//! Argon2 PHC string; skills are resolved to tags like certificate tags.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{
    auth::{hash_password, PasswordError, Role},
    features::{
        shared::{error_helpers::map_unique_violation, validation::FieldValidationError},
        tags::reconcile::dedupe_names,
        users::model::{set_skills, UserFields, UserRecord, UserResponse},
    },
};

#[derive(Clone, Serialize, Deserialize)]
pub struct CreateUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl std::fmt::Debug for CreateUserCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserCommand")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("skills", &self.skills)
            .finish()
    }
}

pub type CreateUserResponse = UserResponse;

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error("User with login '{0}' already exists")]
    DuplicateLogin(String),

    #[error("Password hashing failed: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateUserResponse, CreateUserError>> for CreateUserCommand {}

impl crate::cqrs::middleware::Command for CreateUserCommand {}

impl CreateUserCommand {
    pub fn validate(&self) -> Result<(), CreateUserError> {
        UserFields {
            first_name: &self.first_name,
            last_name: &self.last_name,
            login: &self.login,
            password: Some(&self.password),
            skills: &self.skills,
        }
        .validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(login = %command.login))]
pub async fn handle(
    pool: PgPool,
    command: CreateUserCommand,
) -> Result<CreateUserResponse, CreateUserError> {
    command.validate()?;

    let password_hash = hash_password(&command.password)?;
    let skills = dedupe_names(&command.skills);

    let mut tx = pool.begin().await?;

    let record = sqlx::query_as::<_, UserRecord>(
        r#"
        INSERT INTO users (first_name, last_name, login, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, first_name, last_name, login, password_hash, role, created_at
        "#,
    )
    .bind(command.first_name.trim())
    .bind(command.last_name.trim())
    .bind(&command.login)
    .bind(&password_hash)
    .bind(Role::User)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            CreateUserError::DuplicateLogin(command.login.clone()),
            CreateUserError::Database,
        )
    })?;

    let skills = set_skills(&mut tx, record.id, &skills).await?;

    tx.commit().await?;

    tracing::info!(user_id = record.id, "User signed up");

    Ok(UserResponse::from_record(record, skills))
}
