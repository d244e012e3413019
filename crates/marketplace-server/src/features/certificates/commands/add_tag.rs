//! Attach a tag to a certificate by name
//!
//! The tag is created when no tag with that name exists. Only `DRAFT` and
//! `PUBLISHED` certificates accept new tags.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::{
    certificates::{
        guard::{check_tag_change, TransitionError},
        model::fetch_record_for_update,
    },
    shared::validation::{validate_text, FieldValidationError},
    tags::{
        model::{TAG_NAME_MAX, TAG_NAME_MIN},
        reconcile::get_or_create_tag,
        Tag,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCertificateTagCommand {
    #[serde(skip)]
    pub certificate_id: i64,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AddCertificateTagError {
    #[error("Certificate with id = {0} doesn't exist")]
    NotFound(i64),

    #[error("{0}")]
    Validation(#[from] FieldValidationError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("The certificate already has this tag")]
    AlreadyAttached,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Tag, AddCertificateTagError>> for AddCertificateTagCommand {}

impl crate::cqrs::middleware::Command for AddCertificateTagCommand {}

impl AddCertificateTagCommand {
    pub fn validate(&self) -> Result<(), AddCertificateTagError> {
        validate_text("tag name", &self.name, TAG_NAME_MIN, TAG_NAME_MAX)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(certificate_id = command.certificate_id, tag = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: AddCertificateTagCommand,
) -> Result<Tag, AddCertificateTagError> {
    command.validate()?;
    let name = command.name.trim();

    let mut tx = pool.begin().await?;

    let certificate = fetch_record_for_update(&mut tx, command.certificate_id)
        .await?
        .ok_or(AddCertificateTagError::NotFound(command.certificate_id))?;
    check_tag_change(certificate.status)?;

    let tag = get_or_create_tag(&mut tx, name).await?;

    let inserted = sqlx::query(
        "INSERT INTO certificate_tags (certificate_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(certificate.id)
    .bind(tag.id)
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(AddCertificateTagError::AlreadyAttached);
    }

    sqlx::query("UPDATE certificates SET modification_date = NOW() WHERE id = $1")
        .bind(certificate.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(certificate_id = certificate.id, tag_id = tag.id, "Tag attached to certificate");

    Ok(tag)
}
