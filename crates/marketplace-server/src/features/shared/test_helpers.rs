//! Test helpers and fixtures for database tests
//!
//! Provides utilities to reduce boilerplate in test setup.
//!
//! # Examples
//!
//! ```rust,ignore
//! use marketplace_server::features::shared::test_helpers::*;
//!
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     let certificate = TestCertificate::new("Spa weekend")
//!         .with_status("ACTIVE")
//!         .with_tags(&["spa", "gift"])
//!         .insert(&pool)
//!         .await?;
//!
//!     // ... test logic ...
//!     Ok(())
//! }
//! ```

use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// Builder for creating test tags
#[derive(Debug, Clone)]
pub struct TestTag {
    pub id: i64,
    pub name: String,
}

impl TestTag {
    /// Create a new test tag builder
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }

    /// Insert the tag into the database
    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        let id: i64 = sqlx::query_scalar("INSERT INTO tags (name) VALUES ($1) RETURNING id")
            .bind(&self.name)
            .fetch_one(pool)
            .await?;

        Ok(Self { id, ..self })
    }
}

/// Builder for creating test users
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub login: String,
    pub password_hash: String,
    pub role: String,
}

impl TestUser {
    /// Create a new test user builder with role USER
    pub fn new(login: &str) -> Self {
        Self {
            id: 0,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            login: login.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: "USER".to_string(),
        }
    }

    /// Make the user an administrator
    pub fn admin(mut self) -> Self {
        self.role = "ADMIN".to_string();
        self
    }

    /// Set the stored password hash
    pub fn with_password_hash(mut self, hash: &str) -> Self {
        self.password_hash = hash.to_string();
        self
    }

    /// Insert the user into the database
    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (first_name, last_name, login, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&self.first_name)
        .bind(&self.last_name)
        .bind(&self.login)
        .bind(&self.password_hash)
        .bind(&self.role)
        .fetch_one(pool)
        .await?;

        Ok(Self { id, ..self })
    }
}

/// Builder for creating test certificates
#[derive(Debug, Clone)]
pub struct TestCertificate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub duration: i32,
    pub status: String,
    pub tags: Vec<String>,
    pub creator_id: Option<i64>,
    pub developer_id: Option<i64>,
}

impl TestCertificate {
    /// Create a new DRAFT certificate builder priced at 10.00
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            description: format!("{} description", name),
            price: BigDecimal::from(10),
            duration: 30,
            status: "DRAFT".to_string(),
            tags: Vec::new(),
            creator_id: None,
            developer_id: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the price
    pub fn with_price(mut self, price: BigDecimal) -> Self {
        self.price = price;
        self
    }

    /// Set the duration in days
    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    /// Attach tags by name, creating them when missing
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Record the user who created the certificate
    pub fn with_creator(mut self, user_id: i64) -> Self {
        self.creator_id = Some(user_id);
        self
    }

    /// Assign a developer
    pub fn with_developer(mut self, user_id: i64) -> Self {
        self.developer_id = Some(user_id);
        self
    }

    /// Insert the certificate and its tag links into the database
    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO certificates
                (name, description, price, duration, status, creator_id, developer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&self.name)
        .bind(&self.description)
        .bind(&self.price)
        .bind(self.duration)
        .bind(&self.status)
        .bind(self.creator_id)
        .bind(self.developer_id)
        .fetch_one(pool)
        .await?;

        for tag in &self.tags {
            sqlx::query("INSERT INTO tags (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(tag)
                .execute(pool)
                .await?;
            sqlx::query(
                r#"
                INSERT INTO certificate_tags (certificate_id, tag_id)
                SELECT $1, id FROM tags WHERE name = $2
                "#,
            )
            .bind(id)
            .bind(tag)
            .execute(pool)
            .await?;
        }

        Ok(Self { id, ..self })
    }
}

/// Quick helper to create a user and return its ID
pub async fn create_test_user(pool: &PgPool, login: &str) -> sqlx::Result<i64> {
    let user = TestUser::new(login).insert(pool).await?;
    Ok(user.id)
}

/// Quick helper to create a certificate with a status and return its ID
pub async fn create_test_certificate(
    pool: &PgPool,
    name: &str,
    status: &str,
) -> sqlx::Result<i64> {
    let certificate = TestCertificate::new(name)
        .with_status(status)
        .insert(pool)
        .await?;
    Ok(certificate.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_builder() {
        let certificate = TestCertificate::new("Spa weekend")
            .with_price(BigDecimal::from(25))
            .with_duration(7)
            .with_status("ACTIVE")
            .with_tags(&["spa", "gift"])
            .with_developer(3);

        assert_eq!(certificate.name, "Spa weekend");
        assert_eq!(certificate.description, "Spa weekend description");
        assert_eq!(certificate.price, BigDecimal::from(25));
        assert_eq!(certificate.duration, 7);
        assert_eq!(certificate.status, "ACTIVE");
        assert_eq!(certificate.tags, vec!["spa", "gift"]);
        assert_eq!(certificate.creator_id, None);
        assert_eq!(certificate.developer_id, Some(3));
    }

    #[test]
    fn test_user_builder() {
        let user = TestUser::new("admin.user").admin();
        assert_eq!(user.login, "admin.user");
        assert_eq!(user.role, "ADMIN");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_certificate_insert_links_tags(pool: PgPool) -> sqlx::Result<()> {
        TestTag::new("spa").insert(&pool).await?;
        let certificate = TestCertificate::new("Spa weekend")
            .with_tags(&["spa", "gift"])
            .insert(&pool)
            .await?;

        let linked: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM certificate_tags WHERE certificate_id = $1",
        )
        .bind(certificate.id)
        .fetch_one(&pool)
        .await?;
        assert_eq!(linked, 2);
        Ok(())
    }
}
