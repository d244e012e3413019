use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::fetch_record,
    reviews::model::Review,
    shared::pagination::{Paginated, PaginationError, PaginationParams},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReviewsQuery {
    #[serde(skip)]
    pub certificate_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListReviewsResponse = Paginated<Review>;

#[derive(Debug, thiserror::Error)]
pub enum ListReviewsError {
    #[error("Certificate with id = {0} doesn't exist")]
    CertificateNotFound(i64),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListReviewsResponse, ListReviewsError>> for ListReviewsQuery {}

impl crate::cqrs::middleware::Query for ListReviewsQuery {}

impl ListReviewsQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }
}

#[tracing::instrument(skip(pool), fields(certificate_id = query.certificate_id))]
pub async fn handle(
    pool: PgPool,
    query: ListReviewsQuery,
) -> Result<ListReviewsResponse, ListReviewsError> {
    let pagination = query.pagination();
    pagination.validate()?;

    let mut conn = pool.acquire().await?;

    if fetch_record(&mut conn, query.certificate_id).await?.is_none() {
        return Err(ListReviewsError::CertificateNotFound(query.certificate_id));
    }

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE certificate_id = $1")
        .bind(query.certificate_id)
        .fetch_one(&mut *conn)
        .await?;

    let items = sqlx::query_as::<_, Review>(
        r#"
        SELECT id, certificate_id, creator_id, developer_id, comment, rating, review_date
        FROM reviews
        WHERE certificate_id = $1
        ORDER BY review_date DESC, id DESC
        LIMIT $2
        OFFSET $3
        "#,
    )
    .bind(query.certificate_id)
    .bind(pagination.per_page())
    .bind(pagination.offset())
    .fetch_all(&mut *conn)
    .await?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        reviews::commands::{create, CreateReviewCommand},
        shared::test_helpers::{create_test_user, TestCertificate},
    };

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_list_reviews(pool: PgPool) -> sqlx::Result<()> {
        let creator = create_test_user(&pool, "john.doe").await?;
        let spa = TestCertificate::new("Spa weekend").with_developer(creator).insert(&pool).await?;
        let dinner = TestCertificate::new("Dinner for two")
            .with_developer(creator)
            .insert(&pool)
            .await?;

        for (certificate_id, rating) in [(spa.id, 5), (spa.id, 3), (dinner.id, 1)] {
            create::handle(
                pool.clone(),
                CreateReviewCommand {
                    certificate_id,
                    creator_id: creator,
                    comment: "Fine".to_string(),
                    rating,
                },
            )
            .await
            .unwrap();
        }

        let page = handle(
            pool.clone(),
            ListReviewsQuery {
                certificate_id: spa.id,
                per_page: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.pages, 2);
        assert_eq!(page.items.len(), 1);

        let missing = handle(
            pool,
            ListReviewsQuery {
                certificate_id: 9999,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(missing, Err(ListReviewsError::CertificateNotFound(9999))));
        Ok(())
    }
}
