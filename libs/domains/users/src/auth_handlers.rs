//! Login endpoint and the authentication middleware.
//!
//! The middleware turns a bearer token into a [`Principal`]: it
//! verifies the signature and expiry, then re-fetches the user so the
//! admin and active flags come from the directory, never from the
//! token.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    routing::post,
    Form, Json, Router,
};
use axum_helpers::{AppError, JwtAuth, Principal};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::repository::UserRepository;
use crate::service::UserService;

/// Application state for login and the auth middleware
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt: JwtAuth,
}

/// Form-encoded login credentials
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// OpenAPI documentation for authentication
#[derive(OpenApi)]
#[openapi(
    paths(login),
    components(schemas(LoginForm, TokenResponse)),
    tags(
        (name = "auth", description = "Authentication endpoints")
    )
)]
pub struct ApiDoc;

pub fn router<R: UserRepository + Clone + 'static>(state: AuthState<R>) -> Router {
    Router::new().route("/login", post(login)).with_state(state)
}

/// Exchange username/password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Unknown username or wrong password"),
        (status = 500, description = "Token issuance failed")
    )
)]
async fn login<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = state
        .service
        .verify_credentials(&form.username, &form.password)
        .await?;

    let access_token = state.jwt.issue_token(user.id).map_err(|e| {
        tracing::error!("Failed to issue token: {:?}", e);
        AppError::InternalServerError("Failed to issue token".to_string())
    })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
}

/// Authentication middleware.
///
/// Rejects with 401 on a missing/invalid/expired token or a subject
/// that no longer resolves to an active account. On success a
/// [`Principal`] is inserted into request extensions for handlers.
pub async fn auth_middleware<R: UserRepository + Clone>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

    let claims = state.jwt.verify_token(&token).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    let user_id = claims
        .user_id()
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    // Role flags come from the directory, not the token.
    let user = state
        .service
        .get_user(user_id)
        .await
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Account is inactive".to_string()));
    }

    request.extensions_mut().insert(Principal {
        id: user.id,
        is_admin: user.is_admin,
        is_active: user.is_active,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_token_missing_or_malformed() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_none());
    }
}
