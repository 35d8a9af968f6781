//! Product API server library: signed-token authentication, interceptor
//! chains and a bounded shutdown sequence.

pub mod config;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod security;
pub mod store;

pub use config::schema::ApiConfig;
pub use lifecycle::{Server, Shutdown};
