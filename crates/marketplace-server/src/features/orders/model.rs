use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

/// Row of the `orders` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub user_id: i64,
    pub total_price: BigDecimal,
    pub purchase_date: DateTime<Utc>,
}

/// One ordered certificate, priced as at purchase time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub certificate_id: i64,
    pub name: String,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub total_price: BigDecimal,
    pub purchase_date: DateTime<Utc>,
    pub certificates: Vec<OrderLine>,
}

impl OrderResponse {
    pub fn from_record(record: OrderRecord, certificates: Vec<OrderLine>) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            total_price: record.total_price,
            purchase_date: record.purchase_date,
            certificates,
        }
    }
}

/// Lines of several orders at once, as `(order_id, line)` pairs
pub(crate) async fn fetch_lines_for(
    conn: &mut PgConnection,
    order_ids: &[i64],
) -> Result<Vec<(i64, OrderLine)>, sqlx::Error> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(i64, i64, String, BigDecimal)> = sqlx::query_as(
        r#"
        SELECT oc.order_id, oc.certificate_id, c.name, oc.price
        FROM order_certificates oc
        JOIN certificates c ON c.id = oc.certificate_id
        WHERE oc.order_id = ANY($1)
        ORDER BY oc.order_id, oc.certificate_id
        "#,
    )
    .bind(order_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(order_id, certificate_id, name, price)| {
            (
                order_id,
                OrderLine {
                    certificate_id,
                    name,
                    price,
                },
            )
        })
        .collect())
}
