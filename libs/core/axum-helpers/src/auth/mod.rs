mod config;
mod jwt;
mod principal;

pub use config::AuthConfig;
pub use jwt::{Claims, JwtAuth};
pub use principal::Principal;
