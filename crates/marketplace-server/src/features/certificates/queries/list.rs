//! Certificate search
//!
//! Parses the raw query string parameters into a [`CertificateSearch`], runs
//! the page and count queries it builds on one connection, and loads the tags
//! of the returned certificates in a single follow-up query.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::{
        model::{
            responses_with_tags, CertificateRecord, CertificateResponse, CertificateStatus,
            ParseStatusError,
        },
        search::{CertificateSearch, InvalidSortField, SortField},
    },
    shared::pagination::{Paginated, PaginationError, PaginationParams},
};

/// Search parameters as they arrive on the query string
///
/// `tag_names` and `status` are comma-separated lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCertificatesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_part: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub type ListCertificatesResponse = Paginated<CertificateResponse>;

#[derive(Debug, thiserror::Error)]
pub enum ListCertificatesError {
    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),

    #[error(transparent)]
    InvalidOrderBy(#[from] InvalidSortField),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ListCertificatesResponse, ListCertificatesError>> for ListCertificatesQuery {}

impl crate::cqrs::middleware::Query for ListCertificatesQuery {}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

impl ListCertificatesQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    /// Parse and validate every parameter into a search
    pub fn to_search(&self) -> Result<CertificateSearch, ListCertificatesError> {
        let pagination = self.pagination();
        pagination.validate()?;

        let statuses = split_list(self.status.as_deref())
            .into_iter()
            .map(str::parse)
            .collect::<Result<Vec<CertificateStatus>, _>>()?;

        let order_by = match self.order_by.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<SortField>()?,
            _ => SortField::default(),
        };

        Ok(CertificateSearch::default()
            .with_tags(&split_list(self.tag_names.as_deref()))
            .with_text(self.text_part.as_deref())
            .with_statuses(&statuses)
            .order_by(order_by)
            .paginate(&pagination))
    }

    /// Filter parameters to repeat in pagination links
    pub fn link_filters(&self) -> Vec<(&'static str, String)> {
        [
            ("tag_names", &self.tag_names),
            ("text_part", &self.text_part),
            ("status", &self.status),
            ("order_by", &self.order_by),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key, v)))
        .collect()
    }
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListCertificatesQuery,
) -> Result<ListCertificatesResponse, ListCertificatesError> {
    let search = query.to_search()?;
    let pagination = query.pagination();

    let mut conn = pool.acquire().await?;

    let records: Vec<CertificateRecord> = search
        .select_query()
        .build_query_as::<CertificateRecord>()
        .fetch_all(&mut *conn)
        .await?;

    let total: i64 = search
        .count_query()
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    let items = responses_with_tags(&mut conn, records).await?;

    tracing::debug!(total, order_by = %search.sort_field(), "Certificates searched");

    Ok(Paginated::from_items(items, &pagination, total))
}
