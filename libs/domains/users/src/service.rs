use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserResponse};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new user with a hashed password.
    ///
    /// The uniqueness pre-checks give friendly errors; the database
    /// unique constraints remain the authoritative guard under
    /// concurrent registration.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        self.validate_password(&input.password)?;

        if self.repository.email_exists(&input.email, None).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }
        if self
            .repository
            .username_exists(&input.username, None)
            .await?
        {
            return Err(UserError::DuplicateUsername(input.username));
        }

        let password_hash = self.hash_password(&input.password)?;
        let user = User::new(input.username, input.email, password_hash);

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    pub async fn get_all_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(ref new_email) = input.email {
            if self.repository.email_exists(new_email, Some(id)).await? {
                return Err(UserError::DuplicateEmail(new_email.clone()));
            }
        }

        let new_password_hash = match input.password {
            Some(ref password) => {
                self.validate_password(password)?;
                Some(self.hash_password(password)?)
            }
            None => None,
        };

        user.apply_update(input, new_password_hash);

        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    /// Delete a user.
    ///
    /// Refused while the user owns an order that has not reached
    /// "completed" or "canceled". Orders the user already owns survive
    /// deletion with their owner reference set to null.
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }

        if self.repository.has_active_orders(id).await? {
            return Err(UserError::ActiveOrders(id));
        }

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Grant or revoke admin privileges.
    pub async fn change_role(&self, id: Uuid, is_admin: bool) -> UserResult<UserResponse> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        user.is_admin = is_admin;
        user.updated_at = chrono::Utc::now();

        let updated = self.repository.update(user).await?;

        tracing::info!(user_id = %id, is_admin, "Changed user role");
        Ok(updated.into())
    }

    /// Verify username/password for login.
    ///
    /// Unknown username and wrong password collapse into the same error
    /// so the response does not reveal which usernames exist.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_username(username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn validate_password(&self, password: &str) -> UserResult<()> {
        if password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if password.len() > 128 {
            return Err(UserError::Validation(
                "Password cannot exceed 128 characters".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};

    fn create_input(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let service = UserService::new(InMemoryUserRepository::new());

        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        // Login works with the original password, not the hash.
        let verified = service
            .verify_credentials("alice", "correct-horse")
            .await
            .unwrap();
        assert_eq!(verified.id, user.id);
        assert!(verified.password_hash.starts_with("$argon2"));

        let result = service.verify_credentials("alice", "wrong-password").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_username_same_error_as_bad_password() {
        let service = UserService::new(InMemoryUserRepository::new());

        let result = service.verify_credentials("nobody", "whatever").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_password() {
        let service = UserService::new(InMemoryUserRepository::new());

        let result = service
            .create_user(CreateUser {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "short".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_user_with_active_orders_is_refused() {
        let repo = InMemoryUserRepository::new();
        let service = UserService::new(repo.clone());

        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        repo.mark_active_order(user.id).await;

        let result = service.delete_user(user.id).await;
        assert!(matches!(result, Err(UserError::ActiveOrders(_))));

        // Still present after the refused delete.
        assert!(service.get_user(user.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user_without_active_orders() {
        let service = UserService::new(InMemoryUserRepository::new());

        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();

        service.delete_user(user.id).await.unwrap();

        let result = service.get_user(user.id).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_change_role() {
        let service = UserService::new(InMemoryUserRepository::new());

        let user = service
            .create_user(create_input("alice", "alice@example.com"))
            .await
            .unwrap();
        assert!(!user.is_admin);

        let updated = service.change_role(user.id, true).await.unwrap();
        assert!(updated.is_admin);
    }

    #[tokio::test]
    async fn test_update_user_duplicate_email_checked_against_others() {
        let mut mock_repo = MockUserRepository::new();
        let user = User::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        let user_id = user.id;

        mock_repo
            .expect_get_by_id()
            .with(mockall::predicate::eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));
        mock_repo
            .expect_email_exists()
            .with(
                mockall::predicate::eq("bob@example.com"),
                mockall::predicate::eq(Some(user_id)),
            )
            .returning(|_, _| Ok(true));

        let service = UserService::new(mock_repo);

        let result = service
            .update_user(
                user_id,
                UpdateUser {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }
}
