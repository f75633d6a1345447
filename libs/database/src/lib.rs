//! PostgreSQL connectivity for the storefront services.
//!
//! Wraps SeaORM connection management behind a small API: configuration
//! from environment variables, connection with retry, migrations, health
//! checks, and a generic [`BaseRepository`] used by the domain crates.
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let config = postgres::PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config(config).await?;
//! postgres::run_migrations::<Migrator>(&db, "storefront_api").await?;
//! ```

pub mod common;
pub mod postgres;
pub mod repository;

pub use common::{DatabaseError, DatabaseResult};
pub use repository::BaseRepository;
