//! Patch certificate command
//!
//! Overlays the supplied fields onto the stored certificate, validates the
//! merged result and then runs it through the same guarded path as a full
//! update, inside a single transaction.

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::update::{apply_update, UpdateCertificateCommand, UpdateCertificateError};
use crate::features::certificates::model::{
    fetch_record_for_update, fetch_tags, CertificateRecord, CertificateResponse, CertificateStatus,
};
use crate::features::tags::Tag;

/// Partial update; absent fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchCertificateCommand {
    #[serde(skip)]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<BigDecimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CertificateStatus>,

    /// When present, replaces the whole tag set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Patch failures are the same as those of a full update
pub type PatchCertificateError = UpdateCertificateError;

impl Request<Result<CertificateResponse, PatchCertificateError>> for PatchCertificateCommand {}

impl crate::cqrs::middleware::Command for PatchCertificateCommand {}

impl PatchCertificateCommand {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.duration.is_none()
            && self.status.is_none()
            && self.tags.is_none()
    }

    /// Full update command built from the stored state with this patch applied
    pub fn overlay(&self, current: &CertificateRecord, current_tags: &[Tag]) -> UpdateCertificateCommand {
        UpdateCertificateCommand {
            id: current.id,
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            price: self.price.clone().unwrap_or_else(|| current.price.clone()),
            duration: self.duration.unwrap_or(current.duration),
            status: self.status.unwrap_or(current.status),
            tags: self
                .tags
                .clone()
                .unwrap_or_else(|| current_tags.iter().map(|t| t.name.clone()).collect()),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(certificate_id = command.id))]
pub async fn handle(
    pool: PgPool,
    command: PatchCertificateCommand,
) -> Result<CertificateResponse, PatchCertificateError> {
    if command.is_empty() {
        return Err(UpdateCertificateError::NoFieldsToUpdate);
    }

    let mut tx = pool.begin().await?;

    let current = fetch_record_for_update(&mut tx, command.id)
        .await?
        .ok_or(UpdateCertificateError::NotFound(command.id))?;
    let current_tags = fetch_tags(&mut tx, current.id).await?;

    let mut merged = command.overlay(&current, &current_tags);
    merged.normalize();
    merged.validate()?;

    let response = apply_update(&mut tx, current, &merged).await?;

    tx.commit().await?;

    tracing::info!(
        certificate_id = response.id,
        status = %response.status,
        "Certificate patched"
    );

    Ok(response)
}
