use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One (product, quantity) pairing within an order request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct OrderLineInput {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Request to place an order
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1), nested)]
    pub lines: Vec<OrderLineInput>,
}

/// Request to overwrite an order's status (admin)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: String,
}

/// Order header
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user; null once the owner account is deleted
    pub user_id: Option<Uuid>,
    /// Current lifecycle status
    pub status_id: Option<Uuid>,
    /// Computed once at creation and immutable thereafter
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted order line. Quantity is immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    /// Null once the product is removed from the catalog
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Order with its resolved status name and line items
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    /// Resolved status name (e.g. "pending")
    pub status: Option<String>,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

/// Validated aggregate handed to the repository for atomic persistence
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub status_id: Uuid,
    pub total_price: Decimal,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_request_must_not_be_empty() {
        let request = CreateOrderRequest { lines: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_line_quantity_must_be_positive() {
        let request = CreateOrderRequest {
            lines: vec![OrderLineInput {
                product_id: Uuid::now_v7(),
                quantity: 0,
            }],
        };
        assert!(request.validate().is_err());

        let request = CreateOrderRequest {
            lines: vec![OrderLineInput {
                product_id: Uuid::now_v7(),
                quantity: 1,
            }],
        };
        assert!(request.validate().is_ok());
    }
}
