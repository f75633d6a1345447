use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Status not found: {0}")]
    NotFound(Uuid),

    #[error("Status with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Status {0} is referenced by at least one order")]
    InUse(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StatusResult<T> = Result<T, StatusError>;

impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::NotFound(id) => AppError::NotFound(format!("Status {} not found", id)),
            StatusError::DuplicateName(name) => {
                AppError::Conflict(format!("Status with name '{}' already exists", name))
            }
            StatusError::InUse(_) => AppError::Conflict(
                "Cannot delete status: it is currently in use by an order".to_string(),
            ),
            StatusError::Validation(msg) => AppError::BadRequest(msg),
            StatusError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for StatusError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
