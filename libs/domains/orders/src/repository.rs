use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain_products::{InMemoryProductRepository, ProductError, ProductRepository};
use domain_statuses::{InMemoryStatusRepository, StatusRepository};

use crate::error::{OrderError, OrderResult};
use crate::models::{NewOrder, Order, OrderDetail, OrderLine};

/// Repository trait for Order persistence
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the order header, its lines, and the stock decrements as
    /// one atomic unit. Either all of it becomes visible or none of it.
    async fn create(&self, new_order: NewOrder) -> OrderResult<Order>;

    /// Get an order with its resolved status name and lines
    async fn get_detail(&self, id: Uuid) -> OrderResult<Option<OrderDetail>>;

    /// All orders owned by a user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> OrderResult<Vec<OrderDetail>>;

    /// Point the order at a different registered status
    async fn set_status(&self, order_id: Uuid, status_id: Uuid) -> OrderResult<()>;
}

/// In-memory implementation of OrderRepository (for development/testing).
///
/// Composes the in-memory catalog and status registry so stock movement
/// and status resolution behave like the real store.
#[derive(Clone)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    lines: Arc<RwLock<HashMap<Uuid, Vec<OrderLine>>>>,
    products: InMemoryProductRepository,
    statuses: InMemoryStatusRepository,
}

impl InMemoryOrderRepository {
    pub fn new(products: InMemoryProductRepository, statuses: InMemoryStatusRepository) -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
            lines: Arc::new(RwLock::new(HashMap::new())),
            products,
            statuses,
        }
    }

    async fn status_name(&self, status_id: Option<Uuid>) -> OrderResult<Option<String>> {
        match status_id {
            Some(id) => {
                let status = self
                    .statuses
                    .get_by_id(id)
                    .await
                    .map_err(|e| OrderError::Internal(e.to_string()))?;
                Ok(status.map(|s| s.name))
            }
            None => Ok(None),
        }
    }

    async fn to_detail(&self, order: Order) -> OrderResult<OrderDetail> {
        let status = self.status_name(order.status_id).await?;
        let lines = self
            .lines
            .read()
            .await
            .get(&order.id)
            .cloned()
            .unwrap_or_default();

        Ok(OrderDetail {
            id: order.id,
            user_id: order.user_id,
            status,
            total_price: order.total_price,
            created_at: order.created_at,
            updated_at: order.updated_at,
            lines,
        })
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, new_order: NewOrder) -> OrderResult<Order> {
        // Validate every line against current stock before touching
        // anything, so a failing line leaves no partial effect.
        for line in &new_order.lines {
            let product = self
                .products
                .get_by_id(line.product_id)
                .await
                .map_err(|e| OrderError::Internal(e.to_string()))?
                .ok_or(OrderError::ProductNotFound(line.product_id))?;

            if product.stock < line.quantity {
                return Err(OrderError::InsufficientStock(product.name));
            }
        }

        for line in &new_order.lines {
            self.products
                .decrement_stock(line.product_id, line.quantity)
                .await
                .map_err(|e| match e {
                    ProductError::NotFound(id) => OrderError::ProductNotFound(id),
                    ProductError::InsufficientStock(id) => {
                        OrderError::InsufficientStock(id.to_string())
                    }
                    other => OrderError::Internal(other.to_string()),
                })?;
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::now_v7(),
            user_id: Some(new_order.user_id),
            status_id: Some(new_order.status_id),
            total_price: new_order.total_price,
            created_at: now,
            updated_at: now,
        };

        let order_lines: Vec<OrderLine> = new_order
            .lines
            .iter()
            .map(|line| OrderLine {
                id: Uuid::now_v7(),
                order_id: order.id,
                product_id: Some(line.product_id),
                quantity: line.quantity,
                created_at: now,
            })
            .collect();

        self.orders.write().await.insert(order.id, order.clone());
        self.lines.write().await.insert(order.id, order_lines);
        self.statuses.mark_referenced(new_order.status_id).await;

        tracing::info!(order_id = %order.id, total = %order.total_price, "Created order");
        Ok(order)
    }

    async fn get_detail(&self, id: Uuid) -> OrderResult<Option<OrderDetail>> {
        let order = self.orders.read().await.get(&id).cloned();
        match order {
            Some(order) => Ok(Some(self.to_detail(order).await?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> OrderResult<Vec<OrderDetail>> {
        let mut owned: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut details = Vec::with_capacity(owned.len());
        for order in owned {
            details.push(self.to_detail(order).await?);
        }
        Ok(details)
    }

    async fn set_status(&self, order_id: Uuid, status_id: Uuid) -> OrderResult<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderError::NotFound(order_id))?;

        order.status_id = Some(status_id);
        order.updated_at = Utc::now();
        drop(orders);

        self.statuses.mark_referenced(status_id).await;

        tracing::info!(order_id = %order_id, status_id = %status_id, "Order status changed");
        Ok(())
    }
}
