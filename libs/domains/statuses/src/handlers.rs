use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AppError, Principal, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateStatus, OrderStatus, UpdateStatus};
use crate::repository::StatusRepository;
use crate::service::StatusService;

pub const TAG: &str = "statuses";

/// OpenAPI documentation for the status registry
#[derive(OpenApi)]
#[openapi(
    paths(list_statuses, create_status, get_status, update_status, delete_status),
    components(
        schemas(OrderStatus, CreateStatus, UpdateStatus),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Order status registry (admin only)")
    )
)]
pub struct ApiDoc;

/// Status registry router. Every route requires an admin principal; the
/// app wires the auth middleware in front of this router.
pub fn router<R: StatusRepository + 'static>(service: StatusService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_statuses).post(create_status))
        .route(
            "/{id}",
            get(get_status).put(update_status).delete(delete_status),
        )
        .with_state(shared_service)
}

/// List all registered statuses
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of statuses", body = Vec<OrderStatus>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_statuses<R: StatusRepository>(
    State(service): State<Arc<StatusService<R>>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<OrderStatus>>, AppError> {
    principal.require_admin()?;

    let statuses = service.list_statuses().await?;
    Ok(Json(statuses))
}

/// Register a new status
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateStatus,
    responses(
        (status = 201, description = "Status created", body = OrderStatus),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_status<R: StatusRepository>(
    State(service): State<Arc<StatusService<R>>>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<CreateStatus>,
) -> Result<impl IntoResponse, AppError> {
    principal.require_admin()?;

    let status = service.create_status(input).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// Get a status by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Status ID")),
    responses(
        (status = 200, description = "Status found", body = OrderStatus),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_status<R: StatusRepository>(
    State(service): State<Arc<StatusService<R>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
) -> Result<Json<OrderStatus>, AppError> {
    principal.require_admin()?;

    let status = service.get_status(id).await?;
    Ok(Json(status))
}

/// Rename a status
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Status ID")),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated", body = OrderStatus),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_status<R: StatusRepository>(
    State(service): State<Arc<StatusService<R>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateStatus>,
) -> Result<Json<OrderStatus>, AppError> {
    principal.require_admin()?;

    let status = service.update_status(id, input).await?;
    Ok(Json(status))
}

/// Delete a status
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Status ID")),
    responses(
        (status = 204, description = "Status deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_status<R: StatusRepository>(
    State(service): State<Arc<StatusService<R>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
) -> Result<impl IntoResponse, AppError> {
    principal.require_admin()?;

    service.delete_status(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
