//! Business handlers.
//!
//! Login and health are plain axum handlers. Product handlers implement the
//! chain [`Handler`](crate::http::middleware::Handler) trait so they receive
//! the context built by the interceptors in front of them.

pub mod health;
pub mod login;
pub mod products;

pub use health::health;
pub use login::{login, LoginRequest, LoginResponse};
pub use products::{AddProduct, GetProduct, ListProducts, UpdateProduct};
