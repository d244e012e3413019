use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::fetch_record,
    users::model::{fetch_desired_developers, responses_with_skills, UserResponse},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDesiredDevelopersQuery {
    pub certificate_id: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ListDesiredDevelopersError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<UserResponse>, ListDesiredDevelopersError>> for ListDesiredDevelopersQuery {}

impl crate::cqrs::middleware::Query for ListDesiredDevelopersQuery {}

#[tracing::instrument(skip(pool), fields(certificate_id = query.certificate_id))]
pub async fn handle(
    pool: PgPool,
    query: ListDesiredDevelopersQuery,
) -> Result<Vec<UserResponse>, ListDesiredDevelopersError> {
    let mut conn = pool.acquire().await?;

    if fetch_record(&mut conn, query.certificate_id).await?.is_none() {
        return Err(ListDesiredDevelopersError::NotFound(query.certificate_id));
    }

    let records = fetch_desired_developers(&mut conn, query.certificate_id).await?;
    Ok(responses_with_skills(&mut conn, records).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        certificates::commands::add_desired_developer::{self, AddDesiredDeveloperCommand},
        shared::test_helpers::{create_test_user, TestCertificate},
    };

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_lists_requesters_in_request_order(pool: PgPool) -> sqlx::Result<()> {
        let jane = create_test_user(&pool, "jane.doe").await?;
        let john = create_test_user(&pool, "john.doe").await?;
        let spa = TestCertificate::new("Spa weekend").insert(&pool).await?;
        let other = TestCertificate::new("Dinner for two").insert(&pool).await?;

        for developer_id in [john, jane] {
            add_desired_developer::handle(
                pool.clone(),
                AddDesiredDeveloperCommand {
                    certificate_id: spa.id,
                    developer_id,
                },
            )
            .await
            .unwrap();
        }

        let developers = handle(pool.clone(), ListDesiredDevelopersQuery { certificate_id: spa.id })
            .await
            .unwrap();
        let ids: Vec<i64> = developers.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![john, jane]);

        let none = handle(pool.clone(), ListDesiredDevelopersQuery { certificate_id: other.id })
            .await
            .unwrap();
        assert!(none.is_empty());

        let missing = handle(pool, ListDesiredDevelopersQuery { certificate_id: 9999 }).await;
        assert!(matches!(missing, Err(ListDesiredDevelopersError::NotFound(9999))));
        Ok(())
    }
}
