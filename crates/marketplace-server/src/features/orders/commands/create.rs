//! Place an order
//!
//! Every requested certificate must exist and be `ACTIVE`. Each line stores
//! the certificate's price at purchase time and the order total is their sum;
//! neither is recomputed when certificate prices change later.

use std::collections::HashSet;

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::features::{
    certificates::model::CertificateStatus,
    orders::model::{OrderLine, OrderRecord, OrderResponse},
    users::model::user_exists,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    /// The ordering user, taken from the caller's token
    #[serde(skip)]
    pub user_id: i64,
    pub certificate_ids: Vec<i64>,
}

pub type CreateOrderResponse = OrderResponse;

#[derive(Debug, thiserror::Error)]
pub enum CreateOrderError {
    #[error("Order must contain at least one certificate")]
    Empty,

    #[error("User with id = {0} doesn't exist")]
    UserNotFound(i64),

    #[error("Certificates with ids {0:?} don't exist")]
    CertificatesNotFound(Vec<i64>),

    #[error("Cannot make order with non active certificates")]
    NotActive,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateOrderResponse, CreateOrderError>> for CreateOrderCommand {}

impl crate::cqrs::middleware::Command for CreateOrderCommand {}

#[derive(Debug, FromRow)]
struct OrderedCertificate {
    id: i64,
    name: String,
    price: BigDecimal,
    status: CertificateStatus,
}

impl CreateOrderCommand {
    /// Requested ids without duplicates, in first-seen order
    pub fn unique_ids(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        self.certificate_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn validate(&self) -> Result<(), CreateOrderError> {
        if self.certificate_ids.is_empty() {
            return Err(CreateOrderError::Empty);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool), fields(user_id = command.user_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateOrderCommand,
) -> Result<CreateOrderResponse, CreateOrderError> {
    command.validate()?;
    let ids = command.unique_ids();

    let mut tx = pool.begin().await?;

    if !user_exists(&mut tx, command.user_id).await? {
        return Err(CreateOrderError::UserNotFound(command.user_id));
    }

    // FOR SHARE keeps the certificates from being retired or repriced until commit
    let certificates = sqlx::query_as::<_, OrderedCertificate>(
        r#"
        SELECT id, name, price, status
        FROM certificates
        WHERE id = ANY($1)
        ORDER BY id
        FOR SHARE
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *tx)
    .await?;

    if certificates.len() != ids.len() {
        let found: HashSet<i64> = certificates.iter().map(|c| c.id).collect();
        let missing = ids.into_iter().filter(|id| !found.contains(id)).collect();
        return Err(CreateOrderError::CertificatesNotFound(missing));
    }

    if certificates
        .iter()
        .any(|c| c.status != CertificateStatus::Active)
    {
        return Err(CreateOrderError::NotActive);
    }

    let total_price: BigDecimal = certificates.iter().map(|c| &c.price).sum();

    let record = sqlx::query_as::<_, OrderRecord>(
        r#"
        INSERT INTO orders (user_id, total_price)
        VALUES ($1, $2)
        RETURNING id, user_id, total_price, purchase_date
        "#,
    )
    .bind(command.user_id)
    .bind(&total_price)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO order_certificates (order_id, certificate_id, price)
        SELECT $1, id, price FROM certificates WHERE id = ANY($2)
        "#,
    )
    .bind(record.id)
    .bind(&ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        order_id = record.id,
        lines = certificates.len(),
        total_price = %record.total_price,
        "Order placed"
    );

    let lines = certificates
        .into_iter()
        .map(|c| OrderLine {
            certificate_id: c.id,
            name: c.name,
            price: c.price,
        })
        .collect();

    Ok(OrderResponse::from_record(record, lines))
}
