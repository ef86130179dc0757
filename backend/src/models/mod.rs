//! Data models for the auth server

use serde::Serialize;
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod auth;
pub use auth::*;

/// Registered user as held by the credential store
#[derive(Debug, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Materialize the record with a fresh id and creation timestamp
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_omits_password_hash() {
        let user = NewUser {
            name: "Alice".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$2b$04$hash".to_string(),
        }
        .into_user();

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "alice@x.com");
        assert!(json.get("password_hash").is_none());
    }
}
