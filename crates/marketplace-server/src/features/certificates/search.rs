//! Certificate search query builder
//!
//! Composes the filtered, sorted and paginated certificate query together with
//! a count query that applies exactly the same predicates.
//!
//! - tags: a certificate must carry **every** requested tag (`GROUP BY` +
//!   `HAVING COUNT(DISTINCT t.id) = n`)
//! - text: case-insensitive substring of name OR description
//! - statuses: status must be one of the given values
//!
//! ```rust,ignore
//! let search = CertificateSearch::default()
//!     .with_tags(&["sale"])
//!     .with_text(Some("desc"))
//!     .order_by(SortField::Price);
//!
//! let items = search.select_query().build_query_as::<CertificateRecord>().fetch_all(&pool).await?;
//! let total: i64 = search.count_query().build_query_scalar().fetch_one(&pool).await?;
//! ```

use std::{fmt, str::FromStr};

use sqlx::{Postgres, QueryBuilder};

use super::model::CertificateStatus;
use crate::features::{
    shared::pagination::{PaginationParams, DEFAULT_PER_PAGE},
    tags::reconcile::dedupe_names,
};

/// Fields a search may be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    CreationDate,
    ModificationDate,
    Name,
    Description,
    Price,
    Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid order_by parameter '{0}'. Allowed: id, creationDate, modificationDate, name, description, price, duration")]
pub struct InvalidSortField(pub String);

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::CreationDate => "creationDate",
            SortField::ModificationDate => "modificationDate",
            SortField::Name => "name",
            SortField::Description => "description",
            SortField::Price => "price",
            SortField::Duration => "duration",
        }
    }

    /// Column the field sorts on; only ever one of these fixed names reaches SQL
    fn column(&self) -> &'static str {
        match self {
            SortField::Id => "c.id",
            SortField::CreationDate => "c.creation_date",
            SortField::ModificationDate => "c.modification_date",
            SortField::Name => "c.name",
            SortField::Description => "c.description",
            SortField::Price => "c.price",
            SortField::Duration => "c.duration",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = InvalidSortField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "creationDate" | "creation_date" => Ok(SortField::CreationDate),
            "modificationDate" | "modification_date" => Ok(SortField::ModificationDate),
            "name" => Ok(SortField::Name),
            "description" => Ok(SortField::Description),
            "price" => Ok(SortField::Price),
            "duration" => Ok(SortField::Duration),
            other => Err(InvalidSortField(other.to_string())),
        }
    }
}

/// Parsed certificate search filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSearch {
    tag_names: Vec<String>,
    text_part: Option<String>,
    statuses: Vec<CertificateStatus>,
    order_by: SortField,
    limit: i64,
    offset: i64,
}

impl Default for CertificateSearch {
    fn default() -> Self {
        Self {
            tag_names: Vec::new(),
            text_part: None,
            statuses: Vec::new(),
            order_by: SortField::Id,
            limit: DEFAULT_PER_PAGE,
            offset: 0,
        }
    }
}

impl CertificateSearch {
    /// Require every one of these tags (duplicates and blanks are ignored)
    pub fn with_tags<S: AsRef<str>>(mut self, tag_names: &[S]) -> Self {
        self.tag_names = dedupe_names(tag_names)
            .into_iter()
            .filter(|n| !n.is_empty())
            .collect();
        self
    }

    /// Match a substring of name or description; blank text disables the filter
    pub fn with_text(mut self, text_part: Option<&str>) -> Self {
        self.text_part = text_part
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_statuses(mut self, statuses: &[CertificateStatus]) -> Self {
        self.statuses = Vec::new();
        for status in statuses {
            if !self.statuses.contains(status) {
                self.statuses.push(*status);
            }
        }
        self
    }

    pub fn order_by(mut self, field: SortField) -> Self {
        self.order_by = field;
        self
    }

    pub fn paginate(mut self, params: &PaginationParams) -> Self {
        self.limit = params.per_page();
        self.offset = params.offset();
        self
    }

    pub fn tag_names(&self) -> &[String] {
        &self.tag_names
    }

    pub fn text_part(&self) -> Option<&str> {
        self.text_part.as_deref()
    }

    pub fn statuses(&self) -> &[CertificateStatus] {
        &self.statuses
    }

    pub fn sort_field(&self) -> SortField {
        self.order_by
    }

    /// Page of matching certificates, ordered by the sort field then id
    pub fn select_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT c.id, c.name, c.description, c.price, c.duration, c.status, \
             c.creation_date, c.modification_date, c.creator_id, c.developer_id \
             FROM certificates c",
        );
        self.push_filters(&mut qb);

        qb.push(" ORDER BY ");
        qb.push(self.order_by.column());
        if self.order_by != SortField::Id {
            qb.push(" ASC, c.id");
        }
        qb.push(" ASC LIMIT ");
        qb.push_bind(self.limit);
        qb.push(" OFFSET ");
        qb.push_bind(self.offset);
        qb
    }

    /// Number of certificates matching the same filters, ignoring pagination
    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM (SELECT c.id FROM certificates c");
        self.push_filters(&mut qb);
        qb.push(") matched");
        qb
    }

    fn push_filters(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        if !self.tag_names.is_empty() {
            qb.push(
                " JOIN certificate_tags ct ON ct.certificate_id = c.id \
                 JOIN tags t ON t.id = ct.tag_id AND t.name = ANY(",
            );
            qb.push_bind(self.tag_names.clone());
            qb.push(")");
        }

        let mut has_where = false;

        if let Some(text) = &self.text_part {
            let pattern = like_pattern(text);
            push_condition(qb, &mut has_where);
            qb.push("(c.name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR c.description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        if !self.statuses.is_empty() {
            let statuses: Vec<String> =
                self.statuses.iter().map(|s| s.as_str().to_string()).collect();
            push_condition(qb, &mut has_where);
            qb.push("c.status = ANY(");
            qb.push_bind(statuses);
            qb.push(")");
        }

        if !self.tag_names.is_empty() {
            qb.push(" GROUP BY c.id HAVING COUNT(DISTINCT t.id) = ");
            qb.push_bind(self.tag_names.len() as i64);
        }
    }
}

fn push_condition(qb: &mut QueryBuilder<'static, Postgres>, has_where: &mut bool) {
    qb.push(if *has_where { " AND " } else { " WHERE " });
    *has_where = true;
}

/// `%text%` with LIKE wildcards in the user's text escaped
pub(crate) fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("price".parse::<SortField>().unwrap(), SortField::Price);
        assert_eq!("creationDate".parse::<SortField>().unwrap(), SortField::CreationDate);
        assert_eq!(
            "modification_date".parse::<SortField>().unwrap(),
            SortField::ModificationDate
        );
        assert_eq!(
            "price; DROP TABLE certificates".parse::<SortField>(),
            Err(InvalidSortField("price; DROP TABLE certificates".to_string()))
        );
        assert!("status".parse::<SortField>().is_err());
    }

    #[test]
    fn test_unfiltered_query() {
        let search = CertificateSearch::default();
        assert_eq!(
            squash(search.select_query().sql()),
            "SELECT c.id, c.name, c.description, c.price, c.duration, c.status, \
             c.creation_date, c.modification_date, c.creator_id, c.developer_id \
             FROM certificates c ORDER BY c.id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(
            squash(search.count_query().sql()),
            "SELECT COUNT(*) FROM (SELECT c.id FROM certificates c) matched"
        );
    }

    #[test]
    fn test_all_filters_combined() {
        let search = CertificateSearch::default()
            .with_tags(&["sale", "gift"])
            .with_text(Some("desc"))
            .with_statuses(&[CertificateStatus::Active])
            .order_by(SortField::Price);

        let sql = squash(search.select_query().sql());
        assert!(sql.contains(
            "JOIN certificate_tags ct ON ct.certificate_id = c.id \
             JOIN tags t ON t.id = ct.tag_id AND t.name = ANY($1)"
        ));
        assert!(sql.contains("WHERE (c.name ILIKE $2 OR c.description ILIKE $3)"));
        assert!(sql.contains("AND c.status = ANY($4)"));
        assert!(sql.contains("GROUP BY c.id HAVING COUNT(DISTINCT t.id) = $5"));
        assert!(sql.ends_with("ORDER BY c.price ASC, c.id ASC LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn test_count_query_uses_same_predicates() {
        let search = CertificateSearch::default()
            .with_tags(&["sale"])
            .with_text(Some("spa"))
            .with_statuses(&[CertificateStatus::Draft, CertificateStatus::Active]);

        let select = squash(search.select_query().sql());
        let count = squash(search.count_query().sql());

        let select_filters = select
            .split(" FROM certificates c")
            .nth(1)
            .and_then(|rest| rest.split(" ORDER BY").next())
            .unwrap()
            .to_string();

        assert_eq!(
            count,
            format!("SELECT COUNT(*) FROM (SELECT c.id FROM certificates c{}) matched", select_filters)
        );
        assert!(!count.contains("LIMIT"));
    }

    #[test]
    fn test_status_only_filter() {
        let search =
            CertificateSearch::default().with_statuses(&[CertificateStatus::Inactive]);
        let sql = squash(search.select_query().sql());
        assert!(sql.contains("WHERE c.status = ANY($1)"));
        assert!(!sql.contains("JOIN"));
        assert!(!sql.contains("GROUP BY"));
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let search = CertificateSearch::default().with_tags(&["a", "b", "a", " "]);
        assert_eq!(search.tag_names(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let search = CertificateSearch::default().with_text(Some("   "));
        assert_eq!(search.text_part(), None);
        assert!(!search.select_query().sql().contains("ILIKE"));
    }

    #[test]
    fn test_text_is_matched_verbatim() {
        let search = CertificateSearch::default().with_text(Some("spa "));
        assert_eq!(search.text_part(), Some("spa "));
        assert_eq!(like_pattern(search.text_part().unwrap()), "%spa %");
    }

    #[test]
    fn test_statuses_are_deduplicated() {
        let search = CertificateSearch::default()
            .with_statuses(&[CertificateStatus::Active, CertificateStatus::Active]);
        assert_eq!(search.statuses(), &[CertificateStatus::Active]);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("desc"), "%desc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_paginate() {
        let search =
            CertificateSearch::default().paginate(&PaginationParams::new(Some(3), Some(20)));
        assert_eq!(search.limit, 20);
        assert_eq!(search.offset, 40);
    }
}
