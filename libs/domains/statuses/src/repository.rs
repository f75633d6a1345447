use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StatusError, StatusResult};
use crate::models::{CreateStatus, OrderStatus, UpdateStatus};

/// Repository trait for OrderStatus persistence
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Register a new status
    async fn create(&self, input: CreateStatus) -> StatusResult<OrderStatus>;

    /// Get a status by ID
    async fn get_by_id(&self, id: Uuid) -> StatusResult<Option<OrderStatus>>;

    /// Get a status by its unique name
    async fn get_by_name(&self, name: &str) -> StatusResult<Option<OrderStatus>>;

    /// List all registered statuses
    async fn list(&self) -> StatusResult<Vec<OrderStatus>>;

    /// Rename an existing status
    async fn update(&self, id: Uuid, input: UpdateStatus) -> StatusResult<OrderStatus>;

    /// Delete a status. Fails with [`StatusError::InUse`] while any
    /// order references it.
    async fn delete(&self, id: Uuid) -> StatusResult<bool>;
}

/// In-memory implementation of StatusRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryStatusRepository {
    statuses: Arc<RwLock<HashMap<Uuid, OrderStatus>>>,
    referenced: Arc<RwLock<HashSet<Uuid>>>,
}

impl InMemoryStatusRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the canonical lifecycle names the way the seed
    /// migration does.
    pub async fn with_canonical_statuses() -> Self {
        let repo = Self::new();
        for name in [crate::PENDING, crate::PROCESSING, crate::COMPLETED, crate::CANCELED] {
            repo.create(CreateStatus {
                name: name.to_string(),
            })
            .await
            .expect("seeding canonical statuses");
        }
        repo
    }

    /// Record that an order references this status, so deletion is
    /// refused. Mirrors the foreign key the Postgres schema enforces.
    pub async fn mark_referenced(&self, id: Uuid) {
        self.referenced.write().await.insert(id);
    }
}

#[async_trait]
impl StatusRepository for InMemoryStatusRepository {
    async fn create(&self, input: CreateStatus) -> StatusResult<OrderStatus> {
        let mut statuses = self.statuses.write().await;

        let name_exists = statuses
            .values()
            .any(|s| s.name.eq_ignore_ascii_case(&input.name));
        if name_exists {
            return Err(StatusError::DuplicateName(input.name));
        }

        let status = OrderStatus::new(input.name);
        statuses.insert(status.id, status.clone());

        tracing::info!(status_id = %status.id, name = %status.name, "Created order status");
        Ok(status)
    }

    async fn get_by_id(&self, id: Uuid) -> StatusResult<Option<OrderStatus>> {
        let statuses = self.statuses.read().await;
        Ok(statuses.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> StatusResult<Option<OrderStatus>> {
        let statuses = self.statuses.read().await;
        Ok(statuses.values().find(|s| s.name == name).cloned())
    }

    async fn list(&self) -> StatusResult<Vec<OrderStatus>> {
        let statuses = self.statuses.read().await;
        let mut result: Vec<OrderStatus> = statuses.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateStatus) -> StatusResult<OrderStatus> {
        let mut statuses = self.statuses.write().await;

        if let Some(ref new_name) = input.name {
            let name_exists = statuses
                .values()
                .any(|s| s.id != id && s.name.eq_ignore_ascii_case(new_name));
            if name_exists {
                return Err(StatusError::DuplicateName(new_name.clone()));
            }
        }

        let status = statuses.get_mut(&id).ok_or(StatusError::NotFound(id))?;
        status.apply_update(input);
        let updated = status.clone();

        tracing::info!(status_id = %id, "Updated order status");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> StatusResult<bool> {
        if self.referenced.read().await.contains(&id) {
            return Err(StatusError::InUse(id));
        }

        let mut statuses = self.statuses.write().await;
        if statuses.remove(&id).is_some() {
            tracing::info!(status_id = %id, "Deleted order status");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_by_name() {
        let repo = InMemoryStatusRepository::new();

        let created = repo
            .create(CreateStatus {
                name: "pending".to_string(),
            })
            .await
            .unwrap();

        let fetched = repo.get_by_name("pending").await.unwrap();
        assert_eq!(fetched.unwrap().id, created.id);

        assert!(repo.get_by_name("shipped").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_error() {
        let repo = InMemoryStatusRepository::new();

        repo.create(CreateStatus {
            name: "pending".to_string(),
        })
        .await
        .unwrap();

        let result = repo
            .create(CreateStatus {
                name: "pending".to_string(),
            })
            .await;
        assert!(matches!(result, Err(StatusError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_delete_refused_while_referenced() {
        let repo = InMemoryStatusRepository::new();

        let status = repo
            .create(CreateStatus {
                name: "pending".to_string(),
            })
            .await
            .unwrap();

        repo.mark_referenced(status.id).await;

        let result = repo.delete(status.id).await;
        assert!(matches!(result, Err(StatusError::InUse(_))));

        // Still present after the refused delete.
        assert!(repo.get_by_id(status.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_canonical_seed() {
        let repo = InMemoryStatusRepository::with_canonical_statuses().await;
        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(repo.get_by_name("canceled").await.unwrap().is_some());
    }
}
