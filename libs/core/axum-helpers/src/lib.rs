//! # Axum Helpers
//!
//! Utilities shared by the storefront HTTP services.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT issuance/verification and the authenticated [`Principal`]
//! - **[`errors`]**: structured error responses
//! - **[`extractors`]**: custom extractors (UUID path, validated JSON)
//! - **[`server`]**: server setup, health checks, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod server;

// Re-export auth types
pub use auth::{AuthConfig, Claims, JwtAuth, Principal};

// Re-export error types
pub use errors::{AppError, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};

// Re-export server types
pub use server::{create_app, create_router, health_router, shutdown_signal, HealthResponse};
