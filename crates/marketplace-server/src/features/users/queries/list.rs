use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    shared::pagination::{Paginated, PaginationError, PaginationParams},
    users::model::{responses_with_skills, UserRecord, UserResponse},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListUsersResponse = Paginated<UserResponse>;

#[derive(Debug, thiserror::Error)]
pub enum ListUsersError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListUsersResponse, ListUsersError>> for ListUsersQuery {}

impl crate::cqrs::middleware::Query for ListUsersQuery {}

impl ListUsersQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListUsersQuery,
) -> Result<ListUsersResponse, ListUsersError> {
    let pagination = query.pagination();
    pagination.validate()?;

    let mut conn = pool.acquire().await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;

    let records = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT id, first_name, last_name, login, password_hash, role, created_at
        FROM users
        ORDER BY id
        LIMIT $1
        OFFSET $2
        "#,
    )
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&mut *conn)
    .await?;

    let items = responses_with_skills(&mut conn, records).await?;

    Ok(Paginated::from_items(items, &pagination, total))
}
