//! Status transition guard
//!
//! Decides whether a proposed update is allowed given the certificate's
//! current status:
//!
//! | Current status      | Allowed                                                   |
//! |---------------------|-----------------------------------------------------------|
//! | `DRAFT`/`PUBLISHED` | any change, including status                              |
//! | `ACTIVE`            | only a move to `INACTIVE`, fields unchanged, no tag removed |
//! | `INACTIVE`          | nothing                                                   |
//!
//! Explicit tag attach/detach is allowed only in `DRAFT`/`PUBLISHED`.

use super::model::{CertificateFields, CertificateRecord, CertificateStatus};
use crate::features::tags::{reconcile::TagDiff, Tag};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Cannot update certificate with status INACTIVE")]
    Inactive,

    #[error("Certificate with status ACTIVE can be only set to INACTIVE")]
    ActiveOnlyDeactivate,

    #[error("Cannot change tags of certificate with status {0}")]
    TagsLocked(CertificateStatus),
}

/// Check a full update of `current` (with its `current_tags`) to `next` / `next_status`
pub fn check_update(
    current: &CertificateRecord,
    current_tags: &[Tag],
    next: &CertificateFields<'_>,
    next_status: CertificateStatus,
) -> Result<(), TransitionError> {
    match current.status {
        CertificateStatus::Inactive => Err(TransitionError::Inactive),
        CertificateStatus::Active => {
            let fields_unchanged = next.name == current.name
                && next.description == current.description
                && *next.price == current.price
                && next.duration == current.duration;
            let removes_tags = TagDiff::compute(current_tags, next.tags).removes_tags();

            if next_status == CertificateStatus::Inactive && fields_unchanged && !removes_tags {
                Ok(())
            } else {
                Err(TransitionError::ActiveOnlyDeactivate)
            }
        },
        CertificateStatus::Draft | CertificateStatus::Published => Ok(()),
    }
}

/// Check an explicit tag attach or detach
pub fn check_tag_change(status: CertificateStatus) -> Result<(), TransitionError> {
    if status.allows_tag_changes() {
        Ok(())
    } else {
        Err(TransitionError::TagsLocked(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::Utc;

    fn record(status: CertificateStatus) -> CertificateRecord {
        CertificateRecord {
            id: 1,
            name: "Spa weekend".to_string(),
            description: "A relaxing day".to_string(),
            price: "10.00".parse().unwrap(),
            duration: 10,
            status,
            creation_date: Utc::now(),
            modification_date: Utc::now(),
            creator_id: None,
            developer_id: None,
        }
    }

    fn tags() -> Vec<Tag> {
        vec![
            Tag {
                id: 1,
                name: "a".to_string(),
            },
            Tag {
                id: 2,
                name: "b".to_string(),
            },
        ]
    }

    fn same_fields<'a>(price: &'a BigDecimal, tags: &'a [String]) -> CertificateFields<'a> {
        CertificateFields {
            name: "Spa weekend",
            description: "A relaxing day",
            price,
            duration: 10,
            tags,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inactive_rejects_everything() {
        let price = BigDecimal::from(10);
        let tag_names = names(&["a", "b"]);
        let result = check_update(
            &record(CertificateStatus::Inactive),
            &tags(),
            &same_fields(&price, &tag_names),
            CertificateStatus::Inactive,
        );
        assert_eq!(result, Err(TransitionError::Inactive));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Cannot update certificate with status INACTIVE"
        );
    }

    #[test]
    fn test_active_can_be_deactivated() {
        // 10 and 10.00 compare equal
        let price = BigDecimal::from(10);
        let tag_names = names(&["b", "a"]);
        assert!(check_update(
            &record(CertificateStatus::Active),
            &tags(),
            &same_fields(&price, &tag_names),
            CertificateStatus::Inactive,
        )
        .is_ok());
    }

    #[test]
    fn test_active_rejects_field_changes() {
        let tag_names = names(&["a", "b"]);
        let current = record(CertificateStatus::Active);

        let new_price = BigDecimal::from(12);
        let result = check_update(
            &current,
            &tags(),
            &same_fields(&new_price, &tag_names),
            CertificateStatus::Inactive,
        );
        assert_eq!(result, Err(TransitionError::ActiveOnlyDeactivate));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Certificate with status ACTIVE can be only set to INACTIVE"
        );

        let price = BigDecimal::from(10);
        let mut renamed = same_fields(&price, &tag_names);
        renamed.name = "Spa weekend deluxe";
        assert!(check_update(&current, &tags(), &renamed, CertificateStatus::Inactive).is_err());

        let mut longer = same_fields(&price, &tag_names);
        longer.duration = 20;
        assert!(check_update(&current, &tags(), &longer, CertificateStatus::Inactive).is_err());

        let mut described = same_fields(&price, &tag_names);
        described.description = "Another text";
        assert!(check_update(&current, &tags(), &described, CertificateStatus::Inactive).is_err());
    }

    #[test]
    fn test_active_rejects_tag_removal() {
        let price = BigDecimal::from(10);
        let tag_names = names(&["a"]);
        assert_eq!(
            check_update(
                &record(CertificateStatus::Active),
                &tags(),
                &same_fields(&price, &tag_names),
                CertificateStatus::Inactive,
            ),
            Err(TransitionError::ActiveOnlyDeactivate)
        );
    }

    #[test]
    fn test_active_allows_tag_superset_on_deactivation() {
        let price = BigDecimal::from(10);
        let tag_names = names(&["a", "b", "c"]);
        assert!(check_update(
            &record(CertificateStatus::Active),
            &tags(),
            &same_fields(&price, &tag_names),
            CertificateStatus::Inactive,
        )
        .is_ok());
    }

    #[test]
    fn test_active_rejects_other_statuses() {
        let price = BigDecimal::from(10);
        let tag_names = names(&["a", "b"]);
        for status in [
            CertificateStatus::Active,
            CertificateStatus::Draft,
            CertificateStatus::Published,
        ] {
            assert_eq!(
                check_update(
                    &record(CertificateStatus::Active),
                    &tags(),
                    &same_fields(&price, &tag_names),
                    status,
                ),
                Err(TransitionError::ActiveOnlyDeactivate),
                "ACTIVE -> {} should be rejected",
                status
            );
        }
    }

    #[test]
    fn test_draft_and_published_allow_anything() {
        let price = BigDecimal::from(99);
        let tag_names = names(&["z"]);
        let mut changed = same_fields(&price, &tag_names);
        changed.name = "Completely new";

        for current in [CertificateStatus::Draft, CertificateStatus::Published] {
            for next in CertificateStatus::ALL {
                assert!(check_update(&record(current), &tags(), &changed, next).is_ok());
            }
        }
    }

    #[test]
    fn test_tag_change_guard() {
        assert!(check_tag_change(CertificateStatus::Draft).is_ok());
        assert!(check_tag_change(CertificateStatus::Published).is_ok());
        assert_eq!(
            check_tag_change(CertificateStatus::Active),
            Err(TransitionError::TagsLocked(CertificateStatus::Active))
        );
        assert_eq!(
            check_tag_change(CertificateStatus::Inactive).unwrap_err().to_string(),
            "Cannot change tags of certificate with status INACTIVE"
        );
    }
}
