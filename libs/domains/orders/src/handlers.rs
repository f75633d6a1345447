use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
        UnprocessableEntityResponse,
    },
    AppError, Principal, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use domain_products::ProductRepository;
use domain_statuses::StatusRepository;

use crate::models::{CreateOrderRequest, OrderDetail, OrderLine, OrderLineInput, UpdateOrderStatusRequest};
use crate::repository::OrderRepository;
use crate::service::OrderService;

pub const TAG: &str = "orders";

/// OpenAPI documentation for the order workflow
#[derive(OpenApi)]
#[openapi(
    paths(create_order, get_order, update_order_status, cancel_order, list_user_orders),
    components(
        schemas(OrderDetail, OrderLine, OrderLineInput, CreateOrderRequest, UpdateOrderStatusRequest),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            UnprocessableEntityResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Order placement and lifecycle")
    )
)]
pub struct ApiDoc;

/// Order routes; all require an authenticated principal.
pub fn router<O, P, S>(service: Arc<OrderService<O, P, S>>) -> Router
where
    O: OrderRepository + 'static,
    P: ProductRepository + 'static,
    S: StatusRepository + 'static,
{
    Router::new()
        .route("/", post(create_order))
        .route("/{id}", get(get_order).delete(cancel_order))
        .route("/{id}/status", axum::routing::put(update_order_status))
        .with_state(service)
}

/// `GET /users/{id}/orders`, nested under the users prefix by the app.
pub fn user_orders_router<O, P, S>(service: Arc<OrderService<O, P, S>>) -> Router
where
    O: OrderRepository + 'static,
    P: ProductRepository + 'static,
    S: StatusRepository + 'static,
{
    Router::new()
        .route("/{id}/orders", get(list_user_orders))
        .with_state(service)
}

/// Place an order for the authenticated caller
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderDetail),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<O, P, S>(
    State(service): State<Arc<OrderService<O, P, S>>>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    let order = service.create_order(principal.id, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order (owner or admin)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order found", body = OrderDetail),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<O, P, S>(
    State(service): State<Arc<OrderService<O, P, S>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
) -> Result<Json<OrderDetail>, AppError>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    let order = service.get_order(id, &principal).await?;
    Ok(Json(order))
}

/// Overwrite an order's status with any registered status (admin)
#[utoipa::path(
    put,
    path = "/{id}/status",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderDetail),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order_status<O, P, S>(
    State(service): State<Arc<OrderService<O, P, S>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<OrderDetail>, AppError>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    // Admin check precedes the lookup: non-admins learn nothing about
    // which order ids exist.
    principal.require_admin()?;

    let order = service.update_order_status(id, &input.status).await?;
    Ok(Json(order))
}

/// Cancel a pending order (owner or admin). Stock is not restocked.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order canceled"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn cancel_order<O, P, S>(
    State(service): State<Arc<OrderService<O, P, S>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
) -> Result<impl IntoResponse, AppError>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    service.cancel_order(id, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All orders belonging to a user (self or admin)
#[utoipa::path(
    get,
    path = "/{id}/orders",
    tag = TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's orders", body = Vec<OrderDetail>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_user_orders<O, P, S>(
    State(service): State<Arc<OrderService<O, P, S>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(user_id): UuidPath,
) -> Result<Json<Vec<OrderDetail>>, AppError>
where
    O: OrderRepository,
    P: ProductRepository,
    S: StatusRepository,
{
    principal.require_self_or_admin(user_id)?;

    let orders = service.list_orders_for_user(user_id).await?;
    Ok(Json(orders))
}
