use axum::{routing::get, Json, Router};
use core_config::AppInfo;
use serde::Serialize;
use utoipa::ToSchema;

/// Liveness response with application identity.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

/// Router exposing `GET /health` — a liveness check that never touches
/// downstream dependencies. Readiness belongs to the app, which owns the
/// database handles.
pub fn health_router(app: AppInfo) -> Router {
    Router::new().route(
        "/health",
        get(move || async move {
            Json(HealthResponse {
                status: "ok".to_string(),
                name: app.name.clone(),
                version: app.version.clone(),
            })
        }),
    )
}
