//! Most used tag of the top customer
//!
//! The customer is the user with the highest total spend across all of their
//! orders. Among the certificates in that user's orders, the tag attached to
//! the most of them wins. Ties go to the lower id in both steps.

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MostUsedTagQuery {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MostUsedTagResponse {
    pub id: i64,
    pub name: String,
    /// Number of ordered certificate lines carrying the tag
    pub usage_count: i64,
    pub user_id: i64,
    pub user_total_spent: BigDecimal,
}

#[derive(Debug, thiserror::Error)]
pub enum MostUsedTagError {
    #[error("There are no orders with tagged certificates yet")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<MostUsedTagResponse, MostUsedTagError>> for MostUsedTagQuery {}

impl crate::cqrs::middleware::Query for MostUsedTagQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    _query: MostUsedTagQuery,
) -> Result<MostUsedTagResponse, MostUsedTagError> {
    sqlx::query_as::<_, MostUsedTagResponse>(
        r#"
        WITH top_customer AS (
            SELECT user_id, SUM(total_price) AS total_spent
            FROM orders
            GROUP BY user_id
            ORDER BY total_spent DESC, user_id
            LIMIT 1
        )
        SELECT t.id, t.name, COUNT(*) AS usage_count,
               tc.user_id, tc.total_spent AS user_total_spent
        FROM top_customer tc
        JOIN orders o ON o.user_id = tc.user_id
        JOIN order_certificates oc ON oc.order_id = o.id
        JOIN certificate_tags ct ON ct.certificate_id = oc.certificate_id
        JOIN tags t ON t.id = ct.tag_id
        GROUP BY t.id, t.name, tc.user_id, tc.total_spent
        ORDER BY usage_count DESC, t.id
        LIMIT 1
        "#,
    )
    .fetch_optional(&pool)
    .await?
    .ok_or(MostUsedTagError::NotFound)
}
