//! Update certificate command
//!
//! Full replacement of a certificate's editable fields, status and tag set.
//! The row is locked, the status transition guard is consulted, the name is
//! checked for uniqueness when it changes, and the tag set is reconciled by
//! attaching new names and detaching the ones no longer listed.

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::features::{
    certificates::{
        guard::{check_update, TransitionError},
        model::{
            attach_tags, detach_tags, fetch_record_for_update, fetch_tags, name_taken,
            normalize_price, CertificateFields, CertificateRecord, CertificateResponse,
            CertificateStatus, CERTIFICATE_COLUMNS,
        },
    },
    shared::{error_helpers::map_unique_violation, validation::FieldValidationError},
    tags::reconcile::{dedupe_names, get_or_create_tags, TagDiff},
};

/// Command to replace a certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCertificateCommand {
    /// Taken from the request path
    #[serde(skip)]
    pub id: i64,

    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: i32,
    pub status: CertificateStatus,

    /// The complete desired tag set; omitted means no tags
    #[serde(default)]
    pub tags: Vec<String>,
}

pub type UpdateCertificateResponse = CertificateResponse;

#[derive(Debug, thiserror::Error)]
pub enum UpdateCertificateError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error("At least one field must be provided")]
    NoFieldsToUpdate,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Certificate with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UpdateCertificateResponse, UpdateCertificateError>>
    for UpdateCertificateCommand
{
}

impl crate::cqrs::middleware::Command for UpdateCertificateCommand {}

impl UpdateCertificateCommand {
    /// Trim text fields and deduplicate tag names in place
    pub(crate) fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.tags = dedupe_names(&self.tags);
    }

    fn fields(&self) -> CertificateFields<'_> {
        CertificateFields {
            name: &self.name,
            description: &self.description,
            price: &self.price,
            duration: self.duration,
            tags: &self.tags,
        }
    }

    pub fn validate(&self) -> Result<(), UpdateCertificateError> {
        self.fields().validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(certificate_id = command.id, status = %command.status))]
pub async fn handle(
    pool: PgPool,
    mut command: UpdateCertificateCommand,
) -> Result<UpdateCertificateResponse, UpdateCertificateError> {
    command.normalize();
    command.validate()?;

    let mut tx = pool.begin().await?;

    let current = fetch_record_for_update(&mut tx, command.id)
        .await?
        .ok_or(UpdateCertificateError::NotFound(command.id))?;

    let response = apply_update(&mut tx, current, &command).await?;

    tx.commit().await?;

    tracing::info!(
        certificate_id = response.id,
        status = %response.status,
        "Certificate updated"
    );

    Ok(response)
}

/// Guarded update of an already locked certificate
///
/// `command` must be normalized and validated.
pub(crate) async fn apply_update(
    conn: &mut PgConnection,
    current: CertificateRecord,
    command: &UpdateCertificateCommand,
) -> Result<CertificateResponse, UpdateCertificateError> {
    let current_tags = fetch_tags(conn, current.id).await?;

    check_update(&current, &current_tags, &command.fields(), command.status)?;

    if command.name != current.name && name_taken(conn, &command.name, Some(current.id)).await? {
        return Err(UpdateCertificateError::DuplicateName(command.name.clone()));
    }

    let record = sqlx::query_as::<_, CertificateRecord>(&format!(
        r#"
        UPDATE certificates
        SET name = $2, description = $3, price = $4, duration = $5, status = $6,
            modification_date = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        CERTIFICATE_COLUMNS
    ))
    .bind(current.id)
    .bind(&command.name)
    .bind(&command.description)
    .bind(normalize_price(&command.price))
    .bind(command.duration)
    .bind(command.status)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            UpdateCertificateError::DuplicateName(command.name.clone()),
            UpdateCertificateError::Database,
        )
    })?;

    let diff = TagDiff::compute(&current_tags, &command.tags);
    if !diff.is_empty() {
        detach_tags(conn, record.id, &diff.to_detach).await?;
        let added = get_or_create_tags(conn, &diff.to_attach).await?;
        attach_tags(conn, record.id, &added).await?;

        tracing::debug!(
            certificate_id = record.id,
            attached = diff.to_attach.len(),
            detached = diff.to_detach.len(),
            "Certificate tags reconciled"
        );
    }

    let tags = fetch_tags(conn, record.id).await?;
    Ok(CertificateResponse::from_record(record, tags))
}
