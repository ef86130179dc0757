//! Authentication service
//!
//! Core business logic for email/password registration, login and token
//! verification.

use std::sync::Arc;
use thiserror::Error;

use crate::db::{StoreError, UserRepository};
use crate::models::{AuthResponse, NewUser, User};

use super::jwt::{generate_token, verify_token, Claims, TokenError};
use super::password::{hash_password, verify_password};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email is already in use!")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(#[source] TokenError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Token error: {0}")]
    Token(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::PasswordHash(e.to_string())
    }
}

/// Password checked against when the email is unknown
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl_seconds: i64,
    bcrypt_cost: u32,
    dummy_hash: String,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_secret: String,
        token_ttl_seconds: i64,
        bcrypt_cost: u32,
    ) -> Self {
        // Same cost as real hashes so a miss costs as much as a mismatch
        let dummy_hash = match hash_password(DUMMY_PASSWORD, bcrypt_cost) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(error = %e, cost = bcrypt_cost, "Failed to build dummy password hash");
                String::new()
            }
        };

        Self {
            users,
            jwt_secret,
            token_ttl_seconds,
            bcrypt_cost,
            dummy_hash,
        }
    }

    /// The underlying credential store
    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// Register a new user.
    ///
    /// Fails with [`AuthError::DuplicateEmail`] if the email is taken, either
    /// up front or when a concurrent registration wins the insert.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if self.users.exists_by_email(email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))??;

        let user = self
            .users
            .insert(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(user)
    }

    /// Verify an email/password pair.
    ///
    /// Unknown email and wrong password both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.users.find_by_email(email).await?;

        // Run one bcrypt comparison either way so response time does not
        // reveal whether the email is registered
        let hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        match user {
            Some(user) if matches => Ok(user),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    /// Verify credentials and issue a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self.verify(email, password).await?;

        let token = generate_token(&user, &self.jwt_secret, self.token_ttl_seconds)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(AuthResponse {
            token,
            name: user.name,
            email: user.email,
            message: "Login successful".to_string(),
        })
    }

    /// Resolve a presented bearer token to its claims
    pub fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        verify_token(token, &self.jwt_secret).map_err(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryUserRepository;

    /// bcrypt's minimum cost (the crate keeps `bcrypt::MIN_COST` private)
    const BCRYPT_MIN_COST: u32 = 4;

    const SECRET: &str = "test-secret-key";

    fn create_service() -> (AuthService, InMemoryUserRepository) {
        let repo = InMemoryUserRepository::new();
        let service = AuthService::new(
            Arc::new(repo.clone()),
            SECRET.to_string(),
            3600,
            BCRYPT_MIN_COST,
        );
        (service, repo)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (service, _) = create_service();

        service
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();
        let response = service.login("alice@x.com", "secret123").await.unwrap();

        assert_eq!(response.name, "Alice");
        assert_eq!(response.email, "alice@x.com");
        assert_eq!(response.message, "Login successful");

        let claims = service.authenticate(&response.token).unwrap();
        assert_eq!(claims.sub, "alice@x.com");
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, repo) = create_service();

        service
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();

        let stored = repo.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret123");
        assert!(bcrypt::verify("secret123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let (service, repo) = create_service();

        service
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();
        let result = service.register("Alice 2", "alice@x.com", "other456").await;

        assert!(matches!(result, Err(AuthError::DuplicateEmail)));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registrations_yield_one_user() {
        let (service, repo) = create_service();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .register(&format!("Alice {}", i), "alice@x.com", "secret123")
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AuthError::DuplicateEmail) => {}
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let (service, _) = create_service();
        service
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();

        let unknown = service.login("nobody@x.com", "secret123").await.unwrap_err();
        let wrong = service.login("alice@x.com", "wrong").await.unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_foreign_token() {
        let (service, _) = create_service();
        let other = AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            "another-secret".to_string(),
            3600,
            BCRYPT_MIN_COST,
        );
        other
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();
        let foreign = other.login("alice@x.com", "secret123").await.unwrap();

        let result = service.authenticate(&foreign.token);
        assert!(matches!(
            result,
            Err(AuthError::Unauthenticated(TokenError::Invalid(_)))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_expired_token() {
        let repo = InMemoryUserRepository::new();
        let service = AuthService::new(
            Arc::new(repo),
            SECRET.to_string(),
            -60,
            BCRYPT_MIN_COST,
        );
        service
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();
        let response = service.login("alice@x.com", "secret123").await.unwrap();

        let result = service.authenticate(&response.token);
        assert!(matches!(
            result,
            Err(AuthError::Unauthenticated(TokenError::Expired))
        ));
    }

    #[tokio::test]
    async fn test_unknown_email_costs_a_bcrypt_comparison() {
        let repo = InMemoryUserRepository::new();
        let service = AuthService::new(Arc::new(repo), SECRET.to_string(), 3600, 8);
        service
            .register("Alice", "alice@x.com", "secret123")
            .await
            .unwrap();

        let mut unknown = std::time::Duration::MAX;
        let mut wrong = std::time::Duration::MAX;
        for _ in 0..3 {
            let start = std::time::Instant::now();
            let _ = service.login("nobody@x.com", "secret123").await;
            unknown = unknown.min(start.elapsed());

            let start = std::time::Instant::now();
            let _ = service.login("alice@x.com", "wrong!!").await;
            wrong = wrong.min(start.elapsed());
        }

        assert!(
            unknown * 3 >= wrong,
            "unknown email took {:?}, wrong password took {:?}",
            unknown,
            wrong
        );
    }

    #[tokio::test]
    async fn test_dummy_password_never_authenticates() {
        let (service, _) = create_service();

        let result = service.login("nobody@x.com", DUMMY_PASSWORD).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
