use axum_helpers::Principal;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use domain_products::ProductRepository;
use domain_statuses::{StatusRepository, CANCELED, PENDING};

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrderRequest, NewOrder, NewOrderLine, OrderDetail};
use crate::repository::OrderRepository;

/// The order placement workflow.
///
/// Consumes the catalog and status registry through their repository
/// traits; all mutations flow through the order repository, whose
/// `create` is the transaction boundary.
#[derive(Clone)]
pub struct OrderService<O, P, S>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    orders: Arc<O>,
    products: Arc<P>,
    statuses: Arc<S>,
}

impl<O, P, S> OrderService<O, P, S>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    pub fn new(orders: O, products: P, statuses: S) -> Self {
        Self {
            orders: Arc::new(orders),
            products: Arc::new(products),
            statuses: Arc::new(statuses),
        }
    }

    /// Place an order for `user_id`.
    ///
    /// Pre-checks (status resolution, product existence, availability,
    /// stock, price computation) mutate nothing. Persistence of the
    /// header, lines, and stock decrements happens atomically inside
    /// the repository; the conditional decrement there, not the
    /// pre-check here, is what prevents overselling under concurrency.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        input: CreateOrderRequest,
    ) -> OrderResult<OrderDetail> {
        if input.lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let pending = self
            .statuses
            .get_by_name(PENDING)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?
            .ok_or(OrderError::MissingStatus(PENDING))?;

        let mut total_price = Decimal::ZERO;
        let mut lines = Vec::with_capacity(input.lines.len());

        for line in &input.lines {
            let product = self
                .products
                .get_by_id(line.product_id)
                .await
                .map_err(|e| OrderError::Internal(e.to_string()))?
                .ok_or(OrderError::ProductNotFound(line.product_id))?;

            if !product.is_available {
                return Err(OrderError::ProductUnavailable(product.name));
            }

            if product.stock < line.quantity {
                return Err(OrderError::InsufficientStock(product.name));
            }

            total_price += product.price * Decimal::from(line.quantity);
            lines.push(NewOrderLine {
                product_id: line.product_id,
                quantity: line.quantity,
            });
        }

        let order = self
            .orders
            .create(NewOrder {
                user_id,
                status_id: pending.id,
                total_price,
                lines,
            })
            .await?;

        self.orders
            .get_detail(order.id)
            .await?
            .ok_or_else(|| OrderError::Internal("Created order vanished".to_string()))
    }

    /// Get an order, visible to its owner and to admins.
    pub async fn get_order(&self, id: Uuid, principal: &Principal) -> OrderResult<OrderDetail> {
        let detail = self
            .orders
            .get_detail(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        self.authorize(&detail, principal)?;
        Ok(detail)
    }

    /// All orders for a user. No orders is an empty list, not an error.
    pub async fn list_orders_for_user(&self, user_id: Uuid) -> OrderResult<Vec<OrderDetail>> {
        self.orders.list_for_user(user_id).await
    }

    /// Overwrite the order's status with any registered status.
    ///
    /// Deliberately a flat overwrite: the registry defines which names
    /// exist, but no transition graph is enforced between them. Admin
    /// access is the caller's responsibility.
    pub async fn update_order_status(
        &self,
        id: Uuid,
        status_name: &str,
    ) -> OrderResult<OrderDetail> {
        if self.orders.get_detail(id).await?.is_none() {
            return Err(OrderError::NotFound(id));
        }

        let status = self
            .statuses
            .get_by_name(status_name)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?
            .ok_or_else(|| OrderError::InvalidStatus(status_name.to_string()))?;

        self.orders.set_status(id, status.id).await?;

        self.orders
            .get_detail(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    /// Cancel a pending order.
    ///
    /// Only "pending" orders are cancelable. Reserved stock is NOT
    /// returned to the catalog on cancellation.
    pub async fn cancel_order(&self, id: Uuid, principal: &Principal) -> OrderResult<()> {
        let detail = self
            .orders
            .get_detail(id)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        self.authorize(&detail, principal)?;

        let current = detail.status.as_deref().unwrap_or("unknown");
        if current != PENDING {
            return Err(OrderError::InvalidTransition(current.to_string()));
        }

        let canceled = self
            .statuses
            .get_by_name(CANCELED)
            .await
            .map_err(|e| OrderError::Internal(e.to_string()))?
            .ok_or(OrderError::MissingStatus(CANCELED))?;

        self.orders.set_status(id, canceled.id).await?;

        tracing::info!(order_id = %id, "Order canceled");
        Ok(())
    }

    fn authorize(&self, detail: &OrderDetail, principal: &Principal) -> OrderResult<()> {
        let is_owner = detail.user_id == Some(principal.id);
        if principal.is_admin || is_owner {
            Ok(())
        } else {
            Err(OrderError::Forbidden(detail.id))
        }
    }
}
