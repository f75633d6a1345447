use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, EntityTrait, QueryFilter, QueryOrder, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{line, order};
use crate::error::{OrderError, OrderResult};
use crate::models::{NewOrder, Order, OrderDetail, OrderLine};
use crate::repository::OrderRepository;

/// PostgreSQL implementation of OrderRepository using SeaORM
#[derive(Clone)]
pub struct PgOrderRepository {
    db: DatabaseConnection,
}

impl PgOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Conditional decrement inside the creation transaction. The WHERE
    /// clause is the authoritative oversell guard: two concurrent
    /// orders cannot both take the last unit, whatever their pre-checks
    /// observed.
    async fn decrement_stock_in_txn(
        txn: &DatabaseTransaction,
        product_id: Uuid,
        quantity: i32,
    ) -> OrderResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            "#,
            [product_id.into(), quantity.into()],
        );

        let result = txn
            .execute_raw(stmt)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Zero rows: either the product is gone or the stock ran out.
        let name_stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT name FROM products WHERE id = $1",
            [product_id.into()],
        );

        let row = txn
            .query_one_raw(name_stmt)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        match row {
            Some(row) => {
                let name: String = row
                    .try_get("", "name")
                    .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;
                Err(OrderError::InsufficientStock(name))
            }
            None => Err(OrderError::ProductNotFound(product_id)),
        }
    }

    async fn detail_for(&self, model: order::Model) -> OrderResult<OrderDetail> {
        let status = match model.status_id {
            Some(status_id) => domain_statuses::entity::Entity::find_by_id(status_id)
                .one(&self.db)
                .await
                .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?
                .map(|s| s.name),
            None => None,
        };

        let lines: Vec<OrderLine> = line::Entity::find()
            .filter(line::Column::OrderId.eq(model.id))
            .order_by_asc(line::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?
            .into_iter()
            .map(|m| m.into())
            .collect();

        Ok(OrderDetail {
            id: model.id,
            user_id: model.user_id,
            status,
            total_price: model.total_price,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            lines,
        })
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, new_order: NewOrder) -> OrderResult<Order> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        let now = Utc::now();
        let order_id = Uuid::now_v7();

        let header = order::ActiveModel {
            id: Set(order_id),
            user_id: Set(Some(new_order.user_id)),
            status_id: Set(Some(new_order.status_id)),
            total_price: Set(new_order.total_price),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = header
            .insert(&txn)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        for item in &new_order.lines {
            // A failing line returns early; the dropped transaction
            // rolls back the header, earlier lines, and decrements.
            Self::decrement_stock_in_txn(&txn, item.product_id, item.quantity).await?;

            let line_model = line::ActiveModel {
                id: Set(Uuid::now_v7()),
                order_id: Set(order_id),
                product_id: Set(Some(item.product_id)),
                quantity: Set(item.quantity),
                created_at: Set(now.into()),
            };

            line_model
                .insert(&txn)
                .await
                .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        tracing::info!(order_id = %order_id, total = %model.total_price, "Created order");
        Ok(model.into())
    }

    async fn get_detail(&self, id: Uuid) -> OrderResult<Option<OrderDetail>> {
        let model = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        match model {
            Some(model) => Ok(Some(self.detail_for(model).await?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> OrderResult<Vec<OrderDetail>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        let mut details = Vec::with_capacity(models.len());
        for model in models {
            details.push(self.detail_for(model).await?);
        }
        Ok(details)
    }

    async fn set_status(&self, order_id: Uuid, status_id: Uuid) -> OrderResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE orders SET status_id = $2, updated_at = NOW() WHERE id = $1",
            [order_id.into(), status_id.into()],
        );

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| OrderError::Internal(format!("Database error: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound(order_id));
        }

        tracing::info!(order_id = %order_id, status_id = %status_id, "Order status changed");
        Ok(())
    }
}
