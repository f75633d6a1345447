//! Product Catalog
//!
//! Inventory of purchasable products: CRUD, availability-gated search,
//! and the stock decrement the order workflow relies on. Prices are
//! exact decimals; stock is a non-negative integer guarded both here
//! and by a database check constraint.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{
    CreateProduct, Pagination, Product, ProductSearchParams, SortBy, SortOrder, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
