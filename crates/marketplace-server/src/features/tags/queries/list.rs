use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::search::like_pattern,
    shared::pagination::{Paginated, PaginationError, PaginationParams},
    tags::Tag,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTagsQuery {
    /// Case-insensitive substring of the tag name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListTagsResponse = Paginated<Tag>;

#[derive(Debug, thiserror::Error)]
pub enum ListTagsError {
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListTagsResponse, ListTagsError>> for ListTagsQuery {}

impl crate::cqrs::middleware::Query for ListTagsQuery {}

impl ListTagsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    fn name_pattern(&self) -> Option<String> {
        self.text_part
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(like_pattern)
    }

    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        self.text_part
            .clone()
            .map(|t| vec![("text_part", t)])
            .unwrap_or_default()
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ListTagsQuery) -> Result<ListTagsResponse, ListTagsError> {
    let pagination = query.pagination();
    pagination.validate()?;
    let pattern = query.name_pattern();

    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tags WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
    )
    .bind(&pattern)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, Tag>(
        r#"
        SELECT id, name
        FROM tags
        WHERE ($1::TEXT IS NULL OR name ILIKE $1)
        ORDER BY id
        LIMIT $2
        OFFSET $3
        "#,
    )
    .bind(&pattern)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&pool)
    .await?;

    Ok(Paginated::from_items(items, &pagination, total))
}
