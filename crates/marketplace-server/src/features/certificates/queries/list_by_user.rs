//! Certificates related to one user
//!
//! A user relates to a certificate as its creator, as one of its desired
//! developers, or as its assigned developer.

use std::{fmt, str::FromStr};

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::{
        responses_with_tags, CertificateRecord, CertificateResponse, SELECT_CERTIFICATE,
    },
    shared::pagination::{Paginated, PaginationError, PaginationParams},
    users::model::user_exists,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRelation {
    /// Certificates the user created
    #[default]
    Created,
    /// Certificates the user asked to develop
    Desired,
    /// Certificates the user is assigned to develop
    Taken,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown relation '{0}', expected one of: created, desired, taken")]
pub struct InvalidRelation(pub String);

impl UserRelation {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRelation::Created => "created",
            UserRelation::Desired => "desired",
            UserRelation::Taken => "taken",
        }
    }

    /// Predicate on `certificates` with the user id bound as `$1`
    fn condition(&self) -> &'static str {
        match self {
            UserRelation::Created => "creator_id = $1",
            UserRelation::Desired => {
                "id IN (SELECT certificate_id FROM certificate_desired_developers WHERE user_id = $1)"
            },
            UserRelation::Taken => "developer_id = $1",
        }
    }
}

impl fmt::Display for UserRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRelation {
    type Err = InvalidRelation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [UserRelation::Created, UserRelation::Desired, UserRelation::Taken]
            .into_iter()
            .find(|relation| relation.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidRelation(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUserCertificatesQuery {
    #[serde(skip)]
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListUserCertificatesResponse = Paginated<CertificateResponse>;

#[derive(Debug, thiserror::Error)]
pub enum ListUserCertificatesError {
    #[error("User with id = {0} doesn't exist")]
    UserNotFound(i64),

    #[error(transparent)]
    InvalidRelation(#[from] InvalidRelation),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListUserCertificatesResponse, ListUserCertificatesError>>
    for ListUserCertificatesQuery
{
}

impl crate::cqrs::middleware::Query for ListUserCertificatesQuery {}

impl ListUserCertificatesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn relation(&self) -> Result<UserRelation, InvalidRelation> {
        match self.relation.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse(),
            _ => Ok(UserRelation::default()),
        }
    }

    /// Filter parameters to repeat in pagination links
    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        self.relation
            .clone()
            .map(|relation| vec![("relation", relation)])
            .unwrap_or_default()
    }
}

#[tracing::instrument(skip(pool), fields(user_id = query.user_id))]
pub async fn handle(
    pool: PgPool,
    query: ListUserCertificatesQuery,
) -> Result<ListUserCertificatesResponse, ListUserCertificatesError> {
    let relation = query.relation()?;
    let pagination = query.pagination();
    pagination.validate()?;

    let mut conn = pool.acquire().await?;

    if !user_exists(&mut conn, query.user_id).await? {
        return Err(ListUserCertificatesError::UserNotFound(query.user_id));
    }

    let total: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM certificates WHERE {}",
        relation.condition()
    ))
    .bind(query.user_id)
    .fetch_one(&mut *conn)
    .await?;

    let records = sqlx::query_as::<_, CertificateRecord>(&format!(
        "{} WHERE {} ORDER BY id LIMIT $2 OFFSET $3",
        SELECT_CERTIFICATE,
        relation.condition()
    ))
    .bind(query.user_id)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&mut *conn)
    .await?;

    let items = responses_with_tags(&mut conn, records).await?;

    tracing::debug!(total, %relation, "User certificates listed");

    Ok(Paginated::from_items(items, &pagination, total))
}
