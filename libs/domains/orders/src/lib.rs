//! Order Workflow
//!
//! The one multi-entity operation in the system: placing an order reads
//! the status registry and the product catalog, computes an exact
//! decimal total, then persists the order header, its lines, and the
//! stock decrements as a single atomic unit. Retrieval, status
//! overwrite, and cancellation round out the lifecycle.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use models::{
    CreateOrderRequest, NewOrder, NewOrderLine, Order, OrderDetail, OrderLine, OrderLineInput,
    UpdateOrderStatusRequest,
};
pub use postgres::PgOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
