//! Order Status Registry
//!
//! Name-keyed lifecycle labels for orders (pending, processing,
//! completed, canceled). The order workflow resolves statuses by name;
//! this crate owns their CRUD and guards deletion of a status that is
//! still referenced by an order.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{StatusError, StatusResult};
pub use models::{CreateStatus, OrderStatus, UpdateStatus};
pub use postgres::PgStatusRepository;
pub use repository::{InMemoryStatusRepository, StatusRepository};
pub use service::StatusService;

/// Canonical status names seeded by the migrations.
pub const PENDING: &str = "pending";
pub const PROCESSING: &str = "processing";
pub const COMPLETED: &str = "completed";
pub const CANCELED: &str = "canceled";
