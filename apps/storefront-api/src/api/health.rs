use axum::{extract::State, http::StatusCode, Json};
use database::postgres::check_health;
use serde_json::json;

use crate::state::AppState;

/// Readiness probe: healthy only when the database answers.
pub async fn ready_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let status = check_health(&state.db).await;

    if status.is_healthy() {
        Ok(Json(json!({ "status": "ready" })))
    } else {
        tracing::warn!("Readiness check failed: {:?}", status);
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready" })),
        ))
    }
}
