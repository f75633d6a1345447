use std::sync::Arc;
use uuid::Uuid;

use crate::error::{StatusError, StatusResult};
use crate::models::{CreateStatus, OrderStatus, UpdateStatus};
use crate::repository::StatusRepository;

/// Service layer for the status registry
#[derive(Clone)]
pub struct StatusService<R: StatusRepository> {
    repository: Arc<R>,
}

impl<R: StatusRepository> StatusService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_status(&self, input: CreateStatus) -> StatusResult<OrderStatus> {
        self.repository.create(input).await
    }

    pub async fn get_status(&self, id: Uuid) -> StatusResult<OrderStatus> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(StatusError::NotFound(id))
    }

    pub async fn list_statuses(&self) -> StatusResult<Vec<OrderStatus>> {
        self.repository.list().await
    }

    pub async fn update_status(&self, id: Uuid, input: UpdateStatus) -> StatusResult<OrderStatus> {
        self.repository.update(id, input).await
    }

    pub async fn delete_status(&self, id: Uuid) -> StatusResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(StatusError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStatusRepository;

    #[tokio::test]
    async fn test_get_missing_status_is_not_found() {
        let service = StatusService::new(InMemoryStatusRepository::new());
        let result = service.get_status(Uuid::now_v7()).await;
        assert!(matches!(result, Err(StatusError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_status_is_not_found() {
        let service = StatusService::new(InMemoryStatusRepository::new());
        let result = service.delete_status(Uuid::now_v7()).await;
        assert!(matches!(result, Err(StatusError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename_status() {
        let service = StatusService::new(InMemoryStatusRepository::new());

        let status = service
            .create_status(CreateStatus {
                name: "on-hold".to_string(),
            })
            .await
            .unwrap();

        let renamed = service
            .update_status(
                status.id,
                UpdateStatus {
                    name: Some("paused".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(renamed.name, "paused");
        assert!(renamed.updated_at >= status.updated_at);
    }
}
