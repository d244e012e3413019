//! Create certificate command
//!
//! Validates the fields, checks that no other non-INACTIVE certificate uses
//! the name, inserts the row and attaches the (deduplicated) tags, creating
//! any tag that does not exist yet. Everything runs in one transaction.

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::model::{
        attach_tags, fetch_tags, name_taken, normalize_price, CertificateFields, CertificateRecord,
        CertificateResponse, CertificateStatus, CERTIFICATE_COLUMNS,
    },
    shared::{
        error_helpers::{is_foreign_key_violation, map_unique_violation},
        validation::FieldValidationError,
    },
    tags::reconcile::{dedupe_names, get_or_create_tags},
};

/// Command to create a certificate
///
/// ```json
/// {
///   "name": "Spa weekend",
///   "description": "Two days of rest",
///   "price": "120.00",
///   "duration": 30,
///   "status": "DRAFT",
///   "tags": ["spa", "gift"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCertificateCommand {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: i32,

    /// Defaults to `DRAFT`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CertificateStatus>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Taken from the caller's token
    #[serde(skip)]
    pub creator_id: Option<i64>,
}

pub type CreateCertificateResponse = CertificateResponse;

#[derive(Debug, thiserror::Error)]
pub enum CreateCertificateError {
    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error("Certificate with name '{0}' already exists")]
    DuplicateName(String),

    #[error("User with id = {0} doesn't exist")]
    CreatorNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateCertificateResponse, CreateCertificateError>>
    for CreateCertificateCommand
{
}

impl crate::cqrs::middleware::Command for CreateCertificateCommand {}

impl CreateCertificateCommand {
    /// Trimmed name/description and deduplicated tag names
    fn normalized(&self) -> (String, String, Vec<String>) {
        (
            self.name.trim().to_string(),
            self.description.trim().to_string(),
            dedupe_names(&self.tags),
        )
    }

    pub fn validate(&self) -> Result<(), CreateCertificateError> {
        let (name, description, tags) = self.normalized();
        CertificateFields {
            name: &name,
            description: &description,
            price: &self.price,
            duration: self.duration,
            tags: &tags,
        }
        .validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name, tags = command.tags.len()))]
pub async fn handle(
    pool: PgPool,
    command: CreateCertificateCommand,
) -> Result<CreateCertificateResponse, CreateCertificateError> {
    command.validate()?;
    let (name, description, tag_names) = command.normalized();
    let status = command.status.unwrap_or_default();

    let mut tx = pool.begin().await?;

    if name_taken(&mut tx, &name, None).await? {
        return Err(CreateCertificateError::DuplicateName(name));
    }

    let record = sqlx::query_as::<_, CertificateRecord>(&format!(
        r#"
        INSERT INTO certificates (name, description, price, duration, status, creator_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        CERTIFICATE_COLUMNS
    ))
    .bind(&name)
    .bind(&description)
    .bind(normalize_price(&command.price))
    .bind(command.duration)
    .bind(status)
    .bind(command.creator_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match command.creator_id {
        Some(creator_id) if is_foreign_key_violation(&e) => {
            CreateCertificateError::CreatorNotFound(creator_id)
        },
        _ => map_unique_violation(
            e,
            CreateCertificateError::DuplicateName(name.clone()),
            CreateCertificateError::Database,
        ),
    })?;

    let tags = get_or_create_tags(&mut tx, &tag_names).await?;
    attach_tags(&mut tx, record.id, &tags).await?;
    let tags = fetch_tags(&mut tx, record.id).await?;

    tx.commit().await?;

    tracing::info!(
        certificate_id = record.id,
        status = %record.status,
        tag_count = tags.len(),
        "Certificate created"
    );

    Ok(CertificateResponse::from_record(record, tags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::{
        error_helpers::is_unique_violation,
        test_helpers::{create_test_user, TestCertificate},
    };

    fn command(name: &str, tags: &[&str]) -> CreateCertificateCommand {
        CreateCertificateCommand {
            name: name.to_string(),
            description: "A relaxing day".to_string(),
            price: BigDecimal::from(10),
            duration: 30,
            status: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            creator_id: None,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("Spa weekend", &["spa"]).validate().is_ok());
    }

    #[test]
    fn test_validation_short_name() {
        assert!(matches!(
            command("Spa", &[]).validate(),
            Err(CreateCertificateError::Validation(FieldValidationError::Length { .. }))
        ));
    }

    #[test]
    fn test_validation_blank_tag() {
        assert!(matches!(
            command("Spa weekend", &["spa", " "]).validate(),
            Err(CreateCertificateError::Validation(_))
        ));
    }

    #[test]
    fn test_deserialize_defaults() {
        let cmd: CreateCertificateCommand = serde_json::from_value(serde_json::json!({
            "name": "Spa weekend",
            "description": "A relaxing day",
            "price": 10,
            "duration": 30
        }))
        .unwrap();
        assert!(cmd.status.is_none());
        assert!(cmd.tags.is_empty());
        assert!(cmd.creator_id.is_none());
    }

    #[test]
    fn test_validation_rejects_fractional_cents() {
        let mut cmd = command("Spa weekend", &[]);
        cmd.price = "10.005".parse().unwrap();
        assert!(matches!(
            cmd.validate(),
            Err(CreateCertificateError::Validation(FieldValidationError::Format {
                field: "price",
                ..
            }))
        ));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_records_creator(pool: PgPool) -> sqlx::Result<()> {
        let admin = create_test_user(&pool, "admin.user").await?;

        let mut cmd = command("Spa weekend", &[]);
        cmd.creator_id = Some(admin);
        let created = handle(pool.clone(), cmd).await.unwrap();

        assert_eq!(created.creator_id, Some(admin));
        assert_eq!(created.developer_id, None);

        let mut orphan = command("Dinner for two", &[]);
        orphan.creator_id = Some(9999);
        assert!(matches!(
            handle(pool, orphan).await,
            Err(CreateCertificateError::CreatorNotFound(9999))
        ));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_creates_certificate_with_deduplicated_tags(
        pool: PgPool,
    ) -> sqlx::Result<()> {
        let created = handle(pool.clone(), command("Spa weekend", &["b", "a", "b", "a"]))
            .await
            .unwrap();

        assert_eq!(created.status, CertificateStatus::Draft);
        assert_eq!(created.price, "10.00".parse::<BigDecimal>().unwrap());
        let names: Vec<_> = created.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let tag_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&pool)
            .await?;
        assert_eq!(tag_rows, 2);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_reuses_existing_tag(pool: PgPool) -> sqlx::Result<()> {
        let existing: i64 = sqlx::query_scalar("INSERT INTO tags (name) VALUES ('spa') RETURNING id")
            .fetch_one(&pool)
            .await?;

        let created = handle(pool.clone(), command("Spa weekend", &["spa"])).await.unwrap();
        assert_eq!(created.tags[0].id, existing);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_duplicate_name_among_live_certificates(pool: PgPool) -> sqlx::Result<()> {
        TestCertificate::new("duplicate")
            .with_status("ACTIVE")
            .insert(&pool)
            .await?;

        let result = handle(pool.clone(), command("duplicate", &[])).await;
        match result {
            Err(CreateCertificateError::DuplicateName(name)) => assert_eq!(name, "duplicate"),
            other => panic!("expected duplicate name, got {:?}", other),
        }
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_name_reusable_after_retirement(pool: PgPool) -> sqlx::Result<()> {
        TestCertificate::new("duplicate")
            .with_status("INACTIVE")
            .insert(&pool)
            .await?;

        let created = handle(pool.clone(), command("duplicate", &[])).await.unwrap();
        assert_eq!(created.name, "duplicate");
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_live_names_are_unique_in_database(pool: PgPool) -> sqlx::Result<()> {
        TestCertificate::new("duplicate").with_status("PUBLISHED").insert(&pool).await?;

        let err = TestCertificate::new("duplicate").insert(&pool).await.unwrap_err();
        assert!(is_unique_violation(&err));

        // retired rows do not hold the name
        TestCertificate::new("retired").with_status("INACTIVE").insert(&pool).await?;
        TestCertificate::new("retired").with_status("INACTIVE").insert(&pool).await?;
        TestCertificate::new("retired").insert(&pool).await?;
        Ok(())
    }
}
