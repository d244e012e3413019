//! User types shared by commands and queries

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

use crate::{
    auth::Role,
    features::{
        shared::validation::{validate_login, validate_text, FieldValidationError},
        tags::{
            reconcile::{get_or_create_tags, validate_names, TagDiff},
            Tag,
        },
    },
};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 25;
pub const LOGIN_MIN: usize = 5;
pub const LOGIN_MAX: usize = 15;
pub const PASSWORD_MIN: usize = 5;
pub const PASSWORD_MAX: usize = 15;

/// Row of the `users` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User as returned by the API; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub skills: Vec<Tag>,
}

impl UserResponse {
    pub fn from_record(record: UserRecord, skills: Vec<Tag>) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            login: record.login,
            role: record.role,
            created_at: record.created_at,
            skills,
        }
    }
}

/// Editable user fields, validated together on signup and update
#[derive(Clone, PartialEq)]
pub struct UserFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub login: &'a str,
    pub password: Option<&'a str>,
    pub skills: &'a [String],
}

impl UserFields<'_> {
    pub fn validate(&self) -> Result<(), FieldValidationError> {
        validate_text("first_name", self.first_name, NAME_MIN, NAME_MAX)?;
        validate_text("last_name", self.last_name, NAME_MIN, NAME_MAX)?;
        validate_login(self.login, LOGIN_MIN, LOGIN_MAX)?;
        if let Some(password) = self.password {
            validate_password(password)?;
        }
        validate_names(self.skills)?;
        Ok(())
    }
}

/// Passwords are checked as given, without trimming
pub fn validate_password(password: &str) -> Result<(), FieldValidationError> {
    let len = password.chars().count();
    if len == 0 {
        return Err(FieldValidationError::Required { field: "password" });
    }
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(FieldValidationError::Length {
            field: "password",
            min: PASSWORD_MIN,
            max: PASSWORD_MAX,
        });
    }
    Ok(())
}

// ============================================================================
// Shared SQL
// ============================================================================

const SELECT_USER: &str = r#"
    SELECT id, first_name, last_name, login, password_hash, role, created_at
    FROM users
"#;

pub(crate) async fn fetch_user(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(&format!("{} WHERE id = $1", SELECT_USER))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub(crate) async fn fetch_user_for_update(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(&format!("{} WHERE id = $1 FOR UPDATE", SELECT_USER))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub(crate) async fn fetch_user_by_login(
    conn: &mut PgConnection,
    login: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(&format!("{} WHERE login = $1", SELECT_USER))
        .bind(login)
        .fetch_optional(conn)
        .await
}

pub(crate) async fn user_exists(conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await
}

/// Users who asked to develop a certificate, earliest request first
pub(crate) async fn fetch_desired_developers(
    conn: &mut PgConnection,
    certificate_id: i64,
) -> Result<Vec<UserRecord>, sqlx::Error> {
    sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT u.id, u.first_name, u.last_name, u.login, u.password_hash, u.role, u.created_at
        FROM users u
        JOIN certificate_desired_developers d ON d.user_id = u.id
        WHERE d.certificate_id = $1
        ORDER BY d.requested_at, u.id
        "#,
    )
    .bind(certificate_id)
    .fetch_all(conn)
    .await
}

pub(crate) async fn fetch_skills(
    conn: &mut PgConnection,
    user_id: i64,
) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name
        FROM tags t
        JOIN user_skills us ON us.tag_id = t.id
        WHERE us.user_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

/// Skills of several users at once, as `(user_id, tag)` pairs
pub(crate) async fn fetch_skills_for(
    conn: &mut PgConnection,
    user_ids: &[i64],
) -> Result<Vec<(i64, Tag)>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        r#"
        SELECT us.user_id, t.id, t.name
        FROM user_skills us
        JOIN tags t ON t.id = us.tag_id
        WHERE us.user_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(user_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(user_id, id, name)| (user_id, Tag { id, name }))
        .collect())
}

/// Attach each user's skills, loading them in one query
pub(crate) async fn responses_with_skills(
    conn: &mut PgConnection,
    records: Vec<UserRecord>,
) -> Result<Vec<UserResponse>, sqlx::Error> {
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut skills_by_user: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (user_id, tag) in fetch_skills_for(conn, &ids).await? {
        skills_by_user.entry(user_id).or_default().push(tag);
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let skills = skills_by_user.remove(&record.id).unwrap_or_default();
            UserResponse::from_record(record, skills)
        })
        .collect())
}

/// Replace a user's skills with `desired`, returning the resulting set
pub(crate) async fn set_skills(
    conn: &mut PgConnection,
    user_id: i64,
    desired: &[String],
) -> Result<Vec<Tag>, sqlx::Error> {
    let current = fetch_skills(&mut *conn, user_id).await?;
    let diff = TagDiff::compute(&current, desired);
    if diff.is_empty() {
        return Ok(current);
    }

    if diff.removes_tags() {
        let ids: Vec<i64> = diff.to_detach.iter().map(|t| t.id).collect();
        sqlx::query("DELETE FROM user_skills WHERE user_id = $1 AND tag_id = ANY($2)")
            .bind(user_id)
            .bind(&ids)
            .execute(&mut *conn)
            .await?;
    }

    let added = get_or_create_tags(&mut *conn, &diff.to_attach).await?;
    if !added.is_empty() {
        let ids: Vec<i64> = added.iter().map(|t| t.id).collect();
        sqlx::query(
            r#"
            INSERT INTO user_skills (user_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&ids)
        .execute(&mut *conn)
        .await?;
    }

    fetch_skills(conn, user_id).await
}
