use thiserror::Error;

/// Errors surfaced by the database layer.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Health check failed: {0}")]
    HealthCheck(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
