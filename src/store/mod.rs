//! Data store capability.
//!
//! # Data Flow
//! ```text
//! startup:   lifecycle → ping (unreachable = fatal)
//! requests:  handlers → find_user / list / get / insert / update
//! draining:  cleanup task → close (exactly once)
//! ```
//!
//! # Design Decisions
//! - Handlers see the store only through the `DataStore` trait
//! - Using the store after `close` is a per-request error, never a panic

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Product, User};

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("data store is closed")]
    Closed,

    #[error("record not found")]
    NotFound,

    #[error("data store unavailable: {0}")]
    Unavailable(String),
}

/// Query/insert/update access to business records.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Look up a user by name and password digest. `Ok(None)` means bad credentials.
    async fn find_user(&self, username: &str, password_digest: &str) -> Result<Option<User>, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: u64) -> Result<Product, StoreError>;

    /// Insert a product and return it with its assigned id.
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError>;

    /// Replace the product stored under `id`.
    async fn update_product(&self, id: u64, product: Product) -> Result<Product, StoreError>;

    /// Release the store. Later calls fail with `StoreError::Closed`.
    async fn close(&self);
}
