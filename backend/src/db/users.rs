//! User repository port and its PostgreSQL adapter

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{NewUser, User};

/// Credential store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            _ => StoreError::Database(e.to_string()),
        }
    }
}

/// Lookup and persistence of users keyed by email.
///
/// `insert` must reject an email that is already present with
/// [`StoreError::DuplicateEmail`], atomically with respect to other inserts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Whether a user with this email exists
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Persist a new user
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Short backend name for health reporting
    fn backend(&self) -> &'static str;

    /// Whether the store is reachable
    async fn is_healthy(&self) -> bool;
}

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let candidate = new_user.into_user();

        // The unique constraint on email settles concurrent registrations
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.password_hash)
        .bind(candidate.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn is_healthy(&self) -> bool {
        super::check_health(&self.pool).await.is_ok()
    }
}
