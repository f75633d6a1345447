//! HTTP handler tests for the order workflow.
//!
//! Routers are driven directly with `tower::ServiceExt::oneshot`; the
//! authenticated principal is injected with an Extension layer in place
//! of the app's auth middleware.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Extension;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use axum_helpers::Principal;
use domain_orders::{handlers, InMemoryOrderRepository, OrderDetail, OrderService};
use domain_products::{CreateProduct, InMemoryProductRepository, ProductRepository};
use domain_statuses::InMemoryStatusRepository;

type Service =
    OrderService<InMemoryOrderRepository, InMemoryProductRepository, InMemoryStatusRepository>;

async fn setup() -> (Arc<Service>, Uuid) {
    let products = InMemoryProductRepository::new();
    let statuses = InMemoryStatusRepository::with_canonical_statuses().await;
    let orders = InMemoryOrderRepository::new(products.clone(), statuses.clone());

    let product_id = products
        .create(CreateProduct {
            name: "widget".to_string(),
            description: None,
            price: Decimal::from_str("9.99").unwrap(),
            stock: 10,
            is_available: true,
        })
        .await
        .unwrap()
        .id;

    let service = Arc::new(OrderService::new(orders, products, statuses));
    (service, product_id)
}

fn as_principal(id: Uuid, is_admin: bool) -> Principal {
    Principal {
        id,
        is_admin,
        is_active: true,
    }
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_order_returns_201_with_detail() {
    let (service, product_id) = setup().await;
    let user = Uuid::now_v7();
    let app = handlers::router(service).layer(Extension(as_principal(user, false)));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "lines": [{"product_id": product_id, "quantity": 2}]
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let detail: OrderDetail = json_body(response.into_body()).await;
    assert_eq!(detail.status.as_deref(), Some("pending"));
    assert_eq!(detail.total_price, Decimal::from_str("19.98").unwrap());
    assert_eq!(detail.user_id, Some(user));
}

#[tokio::test]
async fn test_create_order_with_zero_quantity_is_rejected() {
    let (service, product_id) = setup().await;
    let app = handlers::router(service).layer(Extension(as_principal(Uuid::now_v7(), false)));

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "lines": [{"product_id": product_id, "quantity": 0}]
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_status_requires_admin() {
    let (service, product_id) = setup().await;
    let user = Uuid::now_v7();

    // Place an order as the user.
    let app = handlers::router(service.clone()).layer(Extension(as_principal(user, false)));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "lines": [{"product_id": product_id, "quantity": 1}]
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let detail: OrderDetail = json_body(response.into_body()).await;

    // The owner is not an admin: 403, even though the order exists.
    let app = handlers::router(service.clone()).layer(Extension(as_principal(user, false)));
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}/status", detail.id))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({"status": "completed"})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // An admin succeeds.
    let app = handlers::router(service).layer(Extension(as_principal(Uuid::now_v7(), true)));
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}/status", detail.id))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({"status": "completed"})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_status_unknown_name_is_422() {
    let (service, product_id) = setup().await;
    let user = Uuid::now_v7();

    let app = handlers::router(service.clone()).layer(Extension(as_principal(user, false)));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "lines": [{"product_id": product_id, "quantity": 1}]
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let detail: OrderDetail = json_body(response.into_body()).await;

    let app = handlers::router(service).layer(Extension(as_principal(Uuid::now_v7(), true)));
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}/status", detail.id))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({"status": "shipped"})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_cancel_order_returns_204() {
    let (service, product_id) = setup().await;
    let user = Uuid::now_v7();

    let app = handlers::router(service.clone()).layer(Extension(as_principal(user, false)));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "lines": [{"product_id": product_id, "quantity": 1}]
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let detail: OrderDetail = json_body(response.into_body()).await;

    let app = handlers::router(service).layer(Extension(as_principal(user, false)));
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/{}", detail.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_get_order_as_stranger_is_403() {
    let (service, product_id) = setup().await;
    let user = Uuid::now_v7();

    let app = handlers::router(service.clone()).layer(Extension(as_principal(user, false)));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "lines": [{"product_id": product_id, "quantity": 1}]
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let detail: OrderDetail = json_body(response.into_body()).await;

    let app =
        handlers::router(service).layer(Extension(as_principal(Uuid::now_v7(), false)));
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{}", detail.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
