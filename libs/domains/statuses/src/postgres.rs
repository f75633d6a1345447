use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    QueryOrder, Statement,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{StatusError, StatusResult},
    models::{CreateStatus, OrderStatus, UpdateStatus},
    repository::StatusRepository,
};

pub struct PgStatusRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgStatusRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn map_db_err(err: sea_orm::DbErr, name: &str) -> StatusError {
        // The unique index is the authoritative duplicate guard; the
        // pre-check only exists for a friendlier error under no contention.
        let msg = err.to_string();
        if msg.contains("duplicate key") || msg.contains("unique constraint") {
            StatusError::DuplicateName(name.to_string())
        } else {
            StatusError::Internal(format!("Database error: {}", err))
        }
    }
}

#[async_trait]
impl StatusRepository for PgStatusRepository {
    async fn create(&self, input: CreateStatus) -> StatusResult<OrderStatus> {
        if self.get_by_name(&input.name).await?.is_some() {
            return Err(StatusError::DuplicateName(input.name));
        }

        let name = input.name.clone();
        let status = OrderStatus::new(input.name);
        let model = self
            .base
            .insert(status.into())
            .await
            .map_err(|e| Self::map_db_err(e, &name))?;

        tracing::info!(status_id = %model.id, name = %model.name, "Created order status");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> StatusResult<Option<OrderStatus>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn get_by_name(&self, name: &str) -> StatusResult<Option<OrderStatus>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Name.eq(name))
            .one(self.base.db())
            .await
            .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> StatusResult<Vec<OrderStatus>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .all(self.base.db())
            .await
            .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateStatus) -> StatusResult<OrderStatus> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?
            .ok_or(StatusError::NotFound(id))?;

        if let Some(ref new_name) = input.name {
            let name_exists = entity::Entity::find()
                .filter(entity::Column::Name.eq(new_name))
                .filter(entity::Column::Id.ne(id))
                .one(self.base.db())
                .await
                .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?
                .is_some();

            if name_exists {
                return Err(StatusError::DuplicateName(new_name.clone()));
            }
        }

        let mut status: OrderStatus = model.into();
        status.apply_update(input);
        let name = status.name.clone();

        let updated = self
            .base
            .update(status.into())
            .await
            .map_err(|e| Self::map_db_err(e, &name))?;

        tracing::info!(status_id = %id, "Updated order status");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> StatusResult<bool> {
        // Friendly pre-check; the RESTRICT foreign key is what actually
        // guarantees a referenced status survives concurrent writers.
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM orders WHERE status_id = $1) AS in_use",
            [id.into()],
        );

        let row = self
            .base
            .db()
            .query_one_raw(stmt)
            .await
            .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?;

        let in_use: bool = row
            .map(|r| r.try_get("", "in_use"))
            .transpose()
            .map_err(|e| StatusError::Internal(format!("Database error: {}", e)))?
            .unwrap_or(false);

        if in_use {
            return Err(StatusError::InUse(id));
        }

        let rows_affected = self.base.delete_by_id(id).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("foreign key") {
                StatusError::InUse(id)
            } else {
                StatusError::Internal(format!("Database error: {}", e))
            }
        })?;

        if rows_affected > 0 {
            tracing::info!(status_id = %id, "Deleted order status");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
