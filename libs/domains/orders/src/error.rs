use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Product '{0}' is currently unavailable")]
    ProductUnavailable(String),

    #[error("Insufficient stock for product '{0}'")]
    InsufficientStock(String),

    #[error("Order must contain at least one line")]
    EmptyOrder,

    #[error("Access to order {0} denied")]
    Forbidden(Uuid),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Only pending orders can be canceled (current status: {0})")]
    InvalidTransition(String),

    /// Reference data the workflow depends on is missing from the
    /// registry. A deployment problem, not a caller mistake.
    #[error("Required status '{0}' is not registered")]
    MissingStatus(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            OrderError::ProductUnavailable(name) => {
                AppError::Conflict(format!("Product '{}' is currently unavailable", name))
            }
            OrderError::InsufficientStock(name) => {
                AppError::Conflict(format!("Insufficient stock for product '{}'", name))
            }
            OrderError::EmptyOrder => {
                AppError::BadRequest("Order must contain at least one line".to_string())
            }
            OrderError::Forbidden(_) => {
                AppError::Forbidden("You do not have permission to access this order".to_string())
            }
            OrderError::InvalidStatus(name) => {
                AppError::UnprocessableEntity(format!("Invalid status: {}", name))
            }
            OrderError::InvalidTransition(current) => AppError::Conflict(format!(
                "Only pending orders can be canceled (current status: {})",
                current
            )),
            OrderError::MissingStatus(name) => {
                AppError::InternalServerError(format!("Required status '{}' is not registered", name))
            }
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
