use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user (password already hashed)
    async fn create(&self, user: User) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Get a user by username (login path)
    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>>;

    /// List all users, newest first
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Check whether an email is taken, optionally excluding one user
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> UserResult<bool>;

    /// Check whether a username is taken, optionally excluding one user
    async fn username_exists(&self, username: &str, exclude: Option<Uuid>) -> UserResult<bool>;

    /// Whether the user owns any order that is still active — i.e. not
    /// yet completed or canceled.
    async fn has_active_orders(&self, user_id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    active_orders: Arc<RwLock<HashSet<Uuid>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that this user has an order in an active state, so
    /// deletion is refused. Stands in for the orders table the Postgres
    /// implementation consults.
    pub async fn mark_active_order(&self, user_id: Uuid) {
        self.active_orders.write().await.insert(user_id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email.to_lowercase() == user.email.to_lowercase())
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        if users
            .values()
            .any(|u| u.username.to_lowercase() == user.username.to_lowercase())
        {
            return Err(UserError::DuplicateUsername(user.username));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users
            .values()
            .any(|u| u.id != user.id && u.email.to_lowercase() == user.email.to_lowercase())
        {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| {
            Some(u.id) != exclude && u.email.to_lowercase() == email.to_lowercase()
        }))
    }

    async fn username_exists(&self, username: &str, exclude: Option<Uuid>) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| {
            Some(u.id) != exclude && u.username.to_lowercase() == username.to_lowercase()
        }))
    }

    async fn has_active_orders(&self, user_id: Uuid) -> UserResult<bool> {
        Ok(self.active_orders.read().await.contains(&user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User::new(username.to_string(), email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_create_and_get_by_username() {
        let repo = InMemoryUserRepository::new();

        let created = repo.create(user("alice", "alice@example.com")).await.unwrap();

        let fetched = repo.get_by_username("alice").await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);
        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_error() {
        let repo = InMemoryUserRepository::new();

        repo.create(user("alice", "alice@example.com")).await.unwrap();

        let result = repo.create(user("alice2", "ALICE@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_duplicate_username_error() {
        let repo = InMemoryUserRepository::new();

        repo.create(user("alice", "alice@example.com")).await.unwrap();

        let result = repo.create(user("alice", "other@example.com")).await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_email_exists_excludes_self() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("alice", "alice@example.com")).await.unwrap();

        assert!(repo.email_exists("alice@example.com", None).await.unwrap());
        assert!(!repo
            .email_exists("alice@example.com", Some(created.id))
            .await
            .unwrap());
    }
}
