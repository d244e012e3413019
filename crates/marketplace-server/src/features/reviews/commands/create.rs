use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::fetch_record,
    reviews::model::{validate_review, Review, ReviewValidationError},
    users::model::user_exists,
};

/// Review a certificate and the developer assigned to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewCommand {
    #[serde(skip)]
    pub certificate_id: i64,
    /// Taken from the caller's token
    #[serde(skip)]
    pub creator_id: i64,
    pub comment: String,
    pub rating: i16,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateReviewError {
    #[error(transparent)]
    Validation(#[from] ReviewValidationError),

    #[error("Certificate with id = {0} doesn't exist")]
    CertificateNotFound(i64),

    #[error("User with id = {0} doesn't exist")]
    UserNotFound(i64),

    #[error("Certificate with id = {0} has no assigned developer")]
    NoDeveloper(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Review, CreateReviewError>> for CreateReviewCommand {}

impl crate::cqrs::middleware::Command for CreateReviewCommand {}

#[tracing::instrument(
    skip(pool, command),
    fields(certificate_id = command.certificate_id, creator_id = command.creator_id)
)]
pub async fn handle(pool: PgPool, command: CreateReviewCommand) -> Result<Review, CreateReviewError> {
    validate_review(&command.comment, command.rating)?;

    let mut tx = pool.begin().await?;

    let certificate = fetch_record(&mut tx, command.certificate_id)
        .await?
        .ok_or(CreateReviewError::CertificateNotFound(command.certificate_id))?;
    let developer_id = certificate
        .developer_id
        .ok_or(CreateReviewError::NoDeveloper(certificate.id))?;
    if !user_exists(&mut tx, command.creator_id).await? {
        return Err(CreateReviewError::UserNotFound(command.creator_id));
    }

    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (certificate_id, creator_id, developer_id, comment, rating)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, certificate_id, creator_id, developer_id, comment, rating, review_date
        "#,
    )
    .bind(command.certificate_id)
    .bind(command.creator_id)
    .bind(developer_id)
    .bind(command.comment.trim())
    .bind(command.rating)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(review_id = review.id, rating = review.rating, "Review created");

    Ok(review)
}
