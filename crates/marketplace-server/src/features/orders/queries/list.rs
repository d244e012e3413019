use std::collections::HashMap;

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    orders::model::{fetch_lines_for, OrderLine, OrderRecord, OrderResponse},
    shared::pagination::{Paginated, PaginationError, PaginationParams},
    users::model::user_exists,
};

/// Orders of one user, newest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListUserOrdersQuery {
    #[serde(skip)]
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListUserOrdersResponse = Paginated<OrderResponse>;

#[derive(Debug, thiserror::Error)]
pub enum ListUserOrdersError {
    #[error("User with id = {0} doesn't exist")]
    UserNotFound(i64),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListUserOrdersResponse, ListUserOrdersError>> for ListUserOrdersQuery {}

impl crate::cqrs::middleware::Query for ListUserOrdersQuery {}

impl ListUserOrdersQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[tracing::instrument(skip(pool), fields(user_id = query.user_id))]
pub async fn handle(
    pool: PgPool,
    query: ListUserOrdersQuery,
) -> Result<ListUserOrdersResponse, ListUserOrdersError> {
    let pagination = query.pagination();
    pagination.validate()?;

    let mut conn = pool.acquire().await?;

    if !user_exists(&mut conn, query.user_id).await? {
        return Err(ListUserOrdersError::UserNotFound(query.user_id));
    }

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(query.user_id)
        .fetch_one(&mut *conn)
        .await?;

    let records = sqlx::query_as::<_, OrderRecord>(
        r#"
        SELECT id, user_id, total_price, purchase_date
        FROM orders
        WHERE user_id = $1
        ORDER BY purchase_date DESC, id DESC
        LIMIT $2
        OFFSET $3
        "#,
    )
    .bind(query.user_id)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&mut *conn)
    .await?;

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for (order_id, line) in fetch_lines_for(&mut conn, &ids).await? {
        lines_by_order.entry(order_id).or_default().push(line);
    }

    let items = records
        .into_iter()
        .map(|record| {
            let lines = lines_by_order.remove(&record.id).unwrap_or_default();
            OrderResponse::from_record(record, lines)
        })
        .collect();

    Ok(Paginated::from_items(items, &pagination, total))
}
