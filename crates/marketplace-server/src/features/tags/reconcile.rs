//! Tag reconciliation
//!
//! Resolves a list of tag names to tag rows (creating missing tags) and
//! computes which associations to attach and detach when an owner's tag set
//! is replaced. Used for certificate tags and user skills.

use std::collections::HashSet;

use sqlx::{PgConnection, Postgres, QueryBuilder};

use super::model::{Tag, TAG_NAME_MAX, TAG_NAME_MIN};
use crate::features::shared::validation::{validate_text, FieldValidationError};

/// Trim names and drop duplicates, keeping first-seen order
///
/// Comparison is case-sensitive: `Spa` and `spa` are two different tags.
pub fn dedupe_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| seen.insert(n.to_string()))
        .map(str::to_string)
        .collect()
}

/// Validate every tag name in a list
pub fn validate_names<S: AsRef<str>>(names: &[S]) -> Result<(), FieldValidationError> {
    for name in names {
        validate_text("tag name", name.as_ref(), TAG_NAME_MIN, TAG_NAME_MAX)?;
    }
    Ok(())
}

/// Difference between an owner's current tags and a desired list of names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Names not currently attached
    pub to_attach: Vec<String>,
    /// Currently attached tags whose names are no longer wanted
    pub to_detach: Vec<Tag>,
}

impl TagDiff {
    pub fn compute(current: &[Tag], desired: &[String]) -> Self {
        let current_names: HashSet<&str> = current.iter().map(|t| t.name.as_str()).collect();
        let desired_names: HashSet<&str> = desired.iter().map(String::as_str).collect();

        Self {
            to_attach: desired
                .iter()
                .filter(|n| !current_names.contains(n.as_str()))
                .cloned()
                .collect(),
            to_detach: current
                .iter()
                .filter(|t| !desired_names.contains(t.name.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_attach.is_empty() && self.to_detach.is_empty()
    }

    /// Whether applying the diff would remove any existing tag
    pub fn removes_tags(&self) -> bool {
        !self.to_detach.is_empty()
    }
}

/// Resolve tag names to rows, creating the missing ones
///
/// Creation uses `ON CONFLICT DO NOTHING`, so two transactions creating the
/// same new name both end up with the single surviving row.
pub async fn get_or_create_tags(
    conn: &mut PgConnection,
    names: &[String],
) -> Result<Vec<Tag>, sqlx::Error> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let mut insert: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO tags (name) ");
    insert.push_values(names, |mut row, name| {
        row.push_bind(name);
    });
    insert.push(" ON CONFLICT (name) DO NOTHING");
    insert.build().execute(&mut *conn).await?;

    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, name FROM tags WHERE name = ANY($1) ORDER BY id",
    )
    .bind(names)
    .fetch_all(&mut *conn)
    .await?;

    tracing::debug!(requested = names.len(), resolved = tags.len(), "Resolved tags");

    Ok(tags)
}

/// Resolve a single tag name, creating it when missing
pub async fn get_or_create_tag(conn: &mut PgConnection, name: &str) -> Result<Tag, sqlx::Error> {
    get_or_create_tags(conn, &[name.to_string()])
        .await?
        .into_iter()
        .next()
        .ok_or(sqlx::Error::RowNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_dedupe_names_keeps_first_occurrence() {
        let names = dedupe_names(&["b", "a", " b ", "a", "c"]);
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_dedupe_names_is_case_sensitive() {
        let names = dedupe_names(&["Spa", "spa"]);
        assert_eq!(names, vec!["Spa", "spa"]);
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_names(&["spa", "gift"]).is_ok());
        assert!(validate_names(&["spa", "  "]).is_err());
        assert!(validate_names(&["x".repeat(51)]).is_err());
    }

    #[test]
    fn test_diff_attach_and_detach() {
        let current = vec![tag(1, "a"), tag(2, "b")];
        let desired = vec!["b".to_string(), "c".to_string()];

        let diff = TagDiff::compute(&current, &desired);
        assert_eq!(diff.to_attach, vec!["c"]);
        assert_eq!(diff.to_detach, vec![tag(1, "a")]);
        assert!(diff.removes_tags());
    }

    #[test]
    fn test_diff_superset_removes_nothing() {
        let current = vec![tag(1, "a")];
        let desired = vec!["a".to_string(), "b".to_string()];

        let diff = TagDiff::compute(&current, &desired);
        assert!(!diff.removes_tags());
        assert_eq!(diff.to_attach, vec!["b"]);
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let current = vec![tag(1, "a"), tag(2, "b")];
        let desired = vec!["b".to_string(), "a".to_string()];
        assert!(TagDiff::compute(&current, &desired).is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_or_create_reuses_existing(pool: PgPool) -> sqlx::Result<()> {
        let existing: i64 = sqlx::query_scalar("INSERT INTO tags (name) VALUES ('spa') RETURNING id")
            .fetch_one(&pool)
            .await?;

        let mut conn = pool.acquire().await?;
        let tags =
            get_or_create_tags(&mut conn, &["spa".to_string(), "gift".to_string()]).await?;

        assert_eq!(tags.len(), 2);
        assert!(tags.iter().any(|t| t.id == existing && t.name == "spa"));
        assert!(tags.iter().any(|t| t.name == "gift"));

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&pool)
            .await?;
        assert_eq!(total, 2);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_get_or_create_single(pool: PgPool) -> sqlx::Result<()> {
        let mut conn = pool.acquire().await?;
        let first = get_or_create_tag(&mut conn, "sale").await?;
        let second = get_or_create_tag(&mut conn, "sale").await?;
        assert_eq!(first, second);
        Ok(())
    }
}
