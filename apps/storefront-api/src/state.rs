//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use database::postgres::DatabaseConnection;

/// Cloned per use; everything inside is cheap Arc-backed handles.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    /// Token signer/verifier built from [`crate::config::Config::auth`]
    pub jwt: JwtAuth,
}
