//! User Directory
//!
//! Account storage and credential verification: CRUD with
//! username/email uniqueness, argon2 password hashing, role changes,
//! and the guard that refuses to delete a user who still has active
//! orders. Login and the auth middleware live in [`auth_handlers`].

pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use auth_handlers::AuthState;
pub use error::{UserError, UserResult};
pub use models::{ChangeRoleRequest, CreateUser, UpdateUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
