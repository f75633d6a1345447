//! Order workflow tests against the in-memory repositories.
//!
//! Exercises the placement invariants end to end: exact decimal
//! totals, stock movement, atomicity of failures, authorization, and
//! cancellation rules.

use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use axum_helpers::Principal;
use domain_orders::{
    CreateOrderRequest, InMemoryOrderRepository, OrderError, OrderLineInput, OrderService,
};
use domain_products::{CreateProduct, InMemoryProductRepository, ProductRepository};
use domain_statuses::{CreateStatus, InMemoryStatusRepository, StatusRepository};

type Service =
    OrderService<InMemoryOrderRepository, InMemoryProductRepository, InMemoryStatusRepository>;

async fn setup() -> (Service, InMemoryProductRepository, InMemoryStatusRepository) {
    let products = InMemoryProductRepository::new();
    let statuses = InMemoryStatusRepository::with_canonical_statuses().await;
    let orders = InMemoryOrderRepository::new(products.clone(), statuses.clone());
    let service = OrderService::new(orders, products.clone(), statuses.clone());
    (service, products, statuses)
}

async fn add_product(
    products: &InMemoryProductRepository,
    name: &str,
    price: &str,
    stock: i32,
    available: bool,
) -> Uuid {
    products
        .create(CreateProduct {
            name: name.to_string(),
            description: None,
            price: Decimal::from_str(price).unwrap(),
            stock,
            is_available: available,
        })
        .await
        .unwrap()
        .id
}

fn owner(id: Uuid) -> Principal {
    Principal {
        id,
        is_admin: false,
        is_active: true,
    }
}

fn admin() -> Principal {
    Principal {
        id: Uuid::now_v7(),
        is_admin: true,
        is_active: true,
    }
}

fn lines(input: &[(Uuid, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        lines: input
            .iter()
            .map(|&(product_id, quantity)| OrderLineInput {
                product_id,
                quantity,
            })
            .collect(),
    }
}

async fn stock_of(products: &InMemoryProductRepository, id: Uuid) -> i32 {
    products.get_by_id(id).await.unwrap().unwrap().stock
}

#[tokio::test]
async fn test_order_total_stock_and_status() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;
    let b = add_product(&products, "product-b", "20.00", 2, true).await;

    let user = Uuid::now_v7();
    let order = service
        .create_order(user, lines(&[(a, 3), (b, 2)]))
        .await
        .unwrap();

    // 3 x 10.00 + 2 x 20.00, exactly.
    assert_eq!(order.total_price, Decimal::from_str("70.00").unwrap());
    assert_eq!(order.status.as_deref(), Some("pending"));
    assert_eq!(order.user_id, Some(user));
    assert_eq!(order.lines.len(), 2);

    assert_eq!(stock_of(&products, a).await, 2);
    assert_eq!(stock_of(&products, b).await, 0);
}

#[tokio::test]
async fn test_oversell_fails_without_partial_effect() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;
    let b = add_product(&products, "product-b", "20.00", 2, true).await;

    let user = Uuid::now_v7();
    service
        .create_order(user, lines(&[(a, 3), (b, 2)]))
        .await
        .unwrap();

    // B is now out of stock; the follow-up order must fail and leave A
    // untouched even though the A line alone would have been fine.
    let result = service.create_order(user, lines(&[(a, 1), (b, 1)])).await;
    assert!(matches!(result, Err(OrderError::InsufficientStock(_))));

    assert_eq!(stock_of(&products, a).await, 2);
    assert_eq!(stock_of(&products, b).await, 0);

    // And no order was persisted for the failed attempt.
    let orders = service.list_orders_for_user(user).await.unwrap();
    assert_eq!(orders.len(), 1);
}

#[tokio::test]
async fn test_unavailable_product_rejects_order() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;
    let hidden = add_product(&products, "hidden", "1.00", 100, false).await;

    let result = service
        .create_order(Uuid::now_v7(), lines(&[(a, 1), (hidden, 1)]))
        .await;

    assert!(matches!(result, Err(OrderError::ProductUnavailable(_))));
    assert_eq!(stock_of(&products, a).await, 5);
    assert_eq!(stock_of(&products, hidden).await, 100);
}

#[tokio::test]
async fn test_unknown_product_rejects_order() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let result = service
        .create_order(Uuid::now_v7(), lines(&[(a, 1), (Uuid::now_v7(), 1)]))
        .await;

    assert!(matches!(result, Err(OrderError::ProductNotFound(_))));
    assert_eq!(stock_of(&products, a).await, 5);
}

#[tokio::test]
async fn test_empty_order_rejected() {
    let (service, _, _) = setup().await;

    let result = service
        .create_order(Uuid::now_v7(), CreateOrderRequest { lines: vec![] })
        .await;
    assert!(matches!(result, Err(OrderError::EmptyOrder)));
}

#[tokio::test]
async fn test_missing_pending_status_is_a_configuration_error() {
    // An unseeded registry: the workflow cannot assign "pending".
    let products = InMemoryProductRepository::new();
    let statuses = InMemoryStatusRepository::new();
    let orders = InMemoryOrderRepository::new(products.clone(), statuses.clone());
    let service = OrderService::new(orders, products.clone(), statuses);

    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let result = service.create_order(Uuid::now_v7(), lines(&[(a, 1)])).await;
    assert!(matches!(result, Err(OrderError::MissingStatus("pending"))));
    assert_eq!(stock_of(&products, a).await, 5);
}

#[tokio::test]
async fn test_get_order_is_idempotent() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let user = Uuid::now_v7();
    let created = service.create_order(user, lines(&[(a, 2)])).await.unwrap();

    let first = service.get_order(created.id, &owner(user)).await.unwrap();
    let second = service.get_order(created.id, &owner(user)).await.unwrap();

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn test_get_order_authorization() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let user = Uuid::now_v7();
    let order = service.create_order(user, lines(&[(a, 1)])).await.unwrap();

    // Owner and admin see the order; a stranger gets Forbidden.
    assert!(service.get_order(order.id, &owner(user)).await.is_ok());
    assert!(service.get_order(order.id, &admin()).await.is_ok());

    let result = service.get_order(order.id, &owner(Uuid::now_v7())).await;
    assert!(matches!(result, Err(OrderError::Forbidden(_))));
}

#[tokio::test]
async fn test_missing_order_is_not_found() {
    let (service, _, _) = setup().await;

    let result = service.get_order(Uuid::now_v7(), &admin()).await;
    assert!(matches!(result, Err(OrderError::NotFound(_))));
}

#[tokio::test]
async fn test_update_status_accepts_any_registered_status() {
    let (service, products, statuses) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let order = service
        .create_order(Uuid::now_v7(), lines(&[(a, 1)]))
        .await
        .unwrap();

    // Flat overwrite: completed -> processing is allowed, no graph.
    let updated = service
        .update_order_status(order.id, "completed")
        .await
        .unwrap();
    assert_eq!(updated.status.as_deref(), Some("completed"));

    let updated = service
        .update_order_status(order.id, "processing")
        .await
        .unwrap();
    assert_eq!(updated.status.as_deref(), Some("processing"));

    // A custom registered status also works.
    statuses
        .create(CreateStatus {
            name: "on-hold".to_string(),
        })
        .await
        .unwrap();
    let updated = service.update_order_status(order.id, "on-hold").await.unwrap();
    assert_eq!(updated.status.as_deref(), Some("on-hold"));
}

#[tokio::test]
async fn test_update_status_rejects_unregistered_name() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let order = service
        .create_order(Uuid::now_v7(), lines(&[(a, 1)]))
        .await
        .unwrap();

    let result = service.update_order_status(order.id, "shipped").await;
    assert!(matches!(result, Err(OrderError::InvalidStatus(_))));
}

#[tokio::test]
async fn test_cancel_pending_order_without_restock() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let user = Uuid::now_v7();
    let order = service.create_order(user, lines(&[(a, 3)])).await.unwrap();
    assert_eq!(stock_of(&products, a).await, 2);

    service.cancel_order(order.id, &owner(user)).await.unwrap();

    let canceled = service.get_order(order.id, &owner(user)).await.unwrap();
    assert_eq!(canceled.status.as_deref(), Some("canceled"));

    // Reserved stock stays reserved; cancellation does not restock.
    assert_eq!(stock_of(&products, a).await, 2);
}

#[tokio::test]
async fn test_cancel_non_pending_order_rejected() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let user = Uuid::now_v7();
    let order = service.create_order(user, lines(&[(a, 1)])).await.unwrap();

    service
        .update_order_status(order.id, "completed")
        .await
        .unwrap();

    let result = service.cancel_order(order.id, &owner(user)).await;
    assert!(matches!(result, Err(OrderError::InvalidTransition(_))));

    // Still completed.
    let detail = service.get_order(order.id, &owner(user)).await.unwrap();
    assert_eq!(detail.status.as_deref(), Some("completed"));
}

#[tokio::test]
async fn test_cancel_authorization() {
    let (service, products, _) = setup().await;
    let a = add_product(&products, "product-a", "10.00", 5, true).await;

    let user = Uuid::now_v7();
    let order = service.create_order(user, lines(&[(a, 1)])).await.unwrap();

    let result = service.cancel_order(order.id, &owner(Uuid::now_v7())).await;
    assert!(matches!(result, Err(OrderError::Forbidden(_))));

    // Admin may cancel on the owner's behalf.
    service.cancel_order(order.id, &admin()).await.unwrap();
}

#[tokio::test]
async fn test_list_orders_for_user_empty_is_ok() {
    let (service, _, _) = setup().await;

    let orders = service.list_orders_for_user(Uuid::now_v7()).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_total_price_has_no_floating_point_drift() {
    let (service, products, _) = setup().await;
    // 0.10 is the classic binary-float trap; 3 x 0.10 must be exactly 0.30.
    let p = add_product(&products, "penny-candy", "0.10", 100, true).await;

    let order = service
        .create_order(Uuid::now_v7(), lines(&[(p, 3)]))
        .await
        .unwrap();

    assert_eq!(order.total_price, Decimal::from_str("0.30").unwrap());
}
