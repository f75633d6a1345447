use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
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

use crate::models::{ChangeRoleRequest, CreateUser, UpdateUser, UserResponse};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the user directory
#[derive(OpenApi)]
#[openapi(
    paths(
        create_user,
        list_users,
        get_user,
        update_user,
        delete_user,
        change_role,
    ),
    components(
        schemas(UserResponse, CreateUser, UpdateUser, ChangeRoleRequest),
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
        (name = TAG, description = "User directory endpoints")
    )
)]
pub struct ApiDoc;

/// Registration needs no authentication.
pub fn public_router<R: UserRepository + 'static>(service: Arc<UserService<R>>) -> Router {
    Router::new()
        .route("/", post(create_user))
        .with_state(service)
}

/// Everything else runs behind the auth middleware.
pub fn protected_router<R: UserRepository + 'static>(service: Arc<UserService<R>>) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/change_role", put(change_role))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(service)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List all users (admin)
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    principal.require_admin()?;

    let users = service.get_all_users().await?;
    Ok(Json(users))
}

/// Get a user by ID (self or admin)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserResponse>, AppError> {
    principal.require_self_or_admin(id)?;

    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user (self or admin)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<Json<UserResponse>, AppError> {
    principal.require_self_or_admin(id)?;

    let user = service.update_user(id, input).await?;
    Ok(Json(user))
}

/// Delete a user (self or admin). Refused while active orders exist;
/// completed history survives with the owner reference nulled.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(principal): Extension<Principal>,
    UuidPath(id): UuidPath,
) -> Result<impl IntoResponse, AppError> {
    principal.require_self_or_admin(id)?;

    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Grant or revoke the admin flag (admin)
#[utoipa::path(
    put,
    path = "/change_role",
    tag = TAG,
    request_body = ChangeRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn change_role<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    principal.require_admin()?;

    let user = service.change_role(input.user_id, input.is_admin).await?;
    Ok(Json(user))
}
