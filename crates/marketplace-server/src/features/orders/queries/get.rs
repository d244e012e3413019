use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::orders::model::{fetch_lines_for, OrderRecord, OrderResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserOrderQuery {
    pub user_id: i64,
    pub order_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum GetUserOrderError {
    #[error("User with id = {user_id} doesn't have order with id = {order_id}")]
    NotFound { user_id: i64, order_id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<OrderResponse, GetUserOrderError>> for GetUserOrderQuery {}

impl crate::cqrs::middleware::Query for GetUserOrderQuery {}

#[tracing::instrument(skip(pool), fields(user_id = query.user_id, order_id = query.order_id))]
pub async fn handle(
    pool: PgPool,
    query: GetUserOrderQuery,
) -> Result<OrderResponse, GetUserOrderError> {
    let mut conn = pool.acquire().await?;

    let record = sqlx::query_as::<_, OrderRecord>(
        r#"
        SELECT id, user_id, total_price, purchase_date
        FROM orders
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(query.order_id)
    .bind(query.user_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(GetUserOrderError::NotFound {
        user_id: query.user_id,
        order_id: query.order_id,
    })?;

    let lines = fetch_lines_for(&mut conn, &[record.id])
        .await?
        .into_iter()
        .map(|(_, line)| line)
        .collect();

    Ok(OrderResponse::from_record(record, lines))
}
