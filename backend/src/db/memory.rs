//! In-process user repository

use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::users::{StoreError, UserRepository};
use crate::models::{NewUser, User};

/// User repository backed by a map keyed on email.
///
/// Contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        match users.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => Ok(slot.insert(new_user.into_user()).clone()),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.is_empty().await);

        let user = repo.insert(new_user("alice@x.com")).await.unwrap();
        let found = repo.find_by_email("alice@x.com").await.unwrap().unwrap();

        assert_eq!(found.id, user.id);
        assert_eq!(found.name, "Alice");
        assert!(repo.exists_by_email("alice@x.com").await.unwrap());
        assert!(!repo.exists_by_email("bob@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(new_user("alice@x.com")).await.unwrap();

        let result = repo.insert(new_user("alice@x.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));

        // The original record is untouched
        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = InMemoryUserRepository::new();
        let handle = repo.clone();

        handle.insert(new_user("alice@x.com")).await.unwrap();
        assert_eq!(repo.len().await, 1);
    }
}
