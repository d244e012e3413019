//! Certificate types shared by commands and queries

use std::{collections::HashMap, fmt, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, FromRow, PgConnection, Postgres, Type,
};

use crate::features::{
    shared::validation::{validate_range, validate_text, FieldValidationError},
    tags::{reconcile::validate_names, Tag},
};

pub const NAME_MIN: usize = 5;
pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MIN: usize = 5;
pub const DESCRIPTION_MAX: usize = 50;
pub const PRICE_MAX: i64 = 20_000;
/// Prices are stored with this many fractional digits.
pub const PRICE_SCALE: i64 = 2;
pub const DURATION_MIN: i32 = 1;
pub const DURATION_MAX: i32 = 100;

/// Lifecycle state of a certificate
///
/// `DRAFT`/`PUBLISHED` may change freely, `ACTIVE` may only be retired and
/// `INACTIVE` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificateStatus {
    #[default]
    Draft,
    Published,
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown certificate status '{0}'")]
pub struct ParseStatusError(pub String);

impl CertificateStatus {
    pub const ALL: [CertificateStatus; 4] = [
        CertificateStatus::Draft,
        CertificateStatus::Published,
        CertificateStatus::Active,
        CertificateStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateStatus::Draft => "DRAFT",
            CertificateStatus::Published => "PUBLISHED",
            CertificateStatus::Active => "ACTIVE",
            CertificateStatus::Inactive => "INACTIVE",
        }
    }

    /// Tags may be attached or detached only before a certificate goes live
    pub fn allows_tag_changes(&self) -> bool {
        matches!(self, CertificateStatus::Draft | CertificateStatus::Published)
    }
}

impl fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CertificateStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

impl Type<Postgres> for CertificateStatus {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for CertificateStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for CertificateStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// Row of the `certificates` table
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CertificateRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: i32,
    pub status: CertificateStatus,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
    /// Account that created the certificate; `None` once that account is deleted
    pub creator_id: Option<i64>,
    /// Developer assigned to deliver the certificate
    pub developer_id: Option<i64>,
}

/// Certificate as returned by the API, tags included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: i32,
    pub status: CertificateStatus,
    pub creation_date: DateTime<Utc>,
    pub modification_date: DateTime<Utc>,
    pub creator_id: Option<i64>,
    pub developer_id: Option<i64>,
    pub tags: Vec<Tag>,
}

impl CertificateResponse {
    pub fn from_record(record: CertificateRecord, tags: Vec<Tag>) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            price: record.price,
            duration: record.duration,
            status: record.status,
            creation_date: record.creation_date,
            modification_date: record.modification_date,
            creator_id: record.creator_id,
            developer_id: record.developer_id,
            tags,
        }
    }
}

/// Editable certificate fields, validated together on create and update
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub price: &'a BigDecimal,
    pub duration: i32,
    pub tags: &'a [String],
}

impl CertificateFields<'_> {
    pub fn validate(&self) -> Result<(), FieldValidationError> {
        validate_text("name", self.name, NAME_MIN, NAME_MAX)?;
        validate_text("description", self.description, DESCRIPTION_MIN, DESCRIPTION_MAX)?;
        validate_range(
            "price",
            self.price,
            &BigDecimal::from(0),
            &BigDecimal::from(PRICE_MAX),
        )?;
        if self.price.with_scale(PRICE_SCALE) != *self.price {
            return Err(FieldValidationError::Format {
                field: "price",
                reason: "must have at most 2 fractional digits",
            });
        }
        validate_range("duration", &self.duration, &DURATION_MIN, &DURATION_MAX)?;
        validate_names(self.tags)?;
        Ok(())
    }
}

/// Pad a validated price to the stored precision
pub fn normalize_price(price: &BigDecimal) -> BigDecimal {
    price.with_scale(PRICE_SCALE)
}

// ============================================================================
// Shared SQL
// ============================================================================

/// Column list matching [`CertificateRecord`]
pub(crate) const CERTIFICATE_COLUMNS: &str =
    "id, name, description, price, duration, status, creation_date, modification_date, \
     creator_id, developer_id";

pub(crate) const SELECT_CERTIFICATE: &str = r#"
    SELECT id, name, description, price, duration, status, creation_date, modification_date,
           creator_id, developer_id
    FROM certificates
"#;

pub(crate) async fn fetch_record(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<CertificateRecord>, sqlx::Error> {
    sqlx::query_as::<_, CertificateRecord>(&format!("{} WHERE id = $1", SELECT_CERTIFICATE))
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Load and row-lock a certificate for the rest of the transaction
pub(crate) async fn fetch_record_for_update(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<CertificateRecord>, sqlx::Error> {
    sqlx::query_as::<_, CertificateRecord>(&format!(
        "{} WHERE id = $1 FOR UPDATE",
        SELECT_CERTIFICATE
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub(crate) async fn fetch_tags(
    conn: &mut PgConnection,
    certificate_id: i64,
) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name
        FROM tags t
        JOIN certificate_tags ct ON ct.tag_id = t.id
        WHERE ct.certificate_id = $1
        ORDER BY t.name
        "#,
    )
    .bind(certificate_id)
    .fetch_all(conn)
    .await
}

/// Tags for several certificates at once, as `(certificate_id, tag)` pairs
pub(crate) async fn fetch_tags_for(
    conn: &mut PgConnection,
    certificate_ids: &[i64],
) -> Result<Vec<(i64, Tag)>, sqlx::Error> {
    if certificate_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<(i64, i64, String)> = sqlx::query_as(
        r#"
        SELECT ct.certificate_id, t.id, t.name
        FROM certificate_tags ct
        JOIN tags t ON t.id = ct.tag_id
        WHERE ct.certificate_id = ANY($1)
        ORDER BY t.name
        "#,
    )
    .bind(certificate_ids)
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(certificate_id, id, name)| (certificate_id, Tag { id, name }))
        .collect())
}

/// Attach each certificate's tags, loading them in one query
pub(crate) async fn responses_with_tags(
    conn: &mut PgConnection,
    records: Vec<CertificateRecord>,
) -> Result<Vec<CertificateResponse>, sqlx::Error> {
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut tags_by_certificate: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (certificate_id, tag) in fetch_tags_for(conn, &ids).await? {
        tags_by_certificate.entry(certificate_id).or_default().push(tag);
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let tags = tags_by_certificate.remove(&record.id).unwrap_or_default();
            CertificateResponse::from_record(record, tags)
        })
        .collect())
}

/// Whether another non-INACTIVE certificate already uses `name`
pub(crate) async fn name_taken(
    conn: &mut PgConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM certificates
            WHERE name = $1 AND status <> 'INACTIVE' AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(conn)
    .await
}

pub(crate) async fn attach_tags(
    conn: &mut PgConnection,
    certificate_id: i64,
    tags: &[Tag],
) -> Result<(), sqlx::Error> {
    if tags.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
    sqlx::query(
        r#"
        INSERT INTO certificate_tags (certificate_id, tag_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(certificate_id)
    .bind(&ids)
    .execute(conn)
    .await?;
    Ok(())
}

pub(crate) async fn detach_tags(
    conn: &mut PgConnection,
    certificate_id: i64,
    tags: &[Tag],
) -> Result<(), sqlx::Error> {
    if tags.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
    sqlx::query("DELETE FROM certificate_tags WHERE certificate_id = $1 AND tag_id = ANY($2)")
        .bind(certificate_id)
        .bind(&ids)
        .execute(conn)
        .await?;
    Ok(())
}
