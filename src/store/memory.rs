//! In-process data store.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use crate::config::UserSeed;
use crate::models::{Product, User};
use crate::store::{DataStore, StoreError};

struct Account {
    user: User,
    password_digest: String,
}

/// Concurrent map backed store. Ids are assigned from a monotonically
/// increasing counter starting at 1.
pub struct MemoryStore {
    products: DashMap<u64, Product>,
    accounts: DashMap<String, Account>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            accounts: DashMap::new(),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Build a store holding the given user accounts.
    pub fn with_users(seeds: &[UserSeed]) -> Self {
        let store = Self::new();
        for (index, seed) in seeds.iter().enumerate() {
            store.add_user(index as u64 + 1, seed);
        }
        store
    }

    fn add_user(&self, id: u64, seed: &UserSeed) {
        self.accounts.insert(
            seed.username.clone(),
            Account {
                user: User {
                    id,
                    username: seed.username.clone(),
                    role: seed.role.clone(),
                    created: Utc::now(),
                },
                password_digest: seed.password_sha256.to_ascii_lowercase(),
            },
        );
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.ensure_open()
    }

    async fn find_user(&self, username: &str, password_digest: &str) -> Result<Option<User>, StoreError> {
        self.ensure_open()?;
        Ok(self
            .accounts
            .get(username)
            .filter(|account| account.password_digest == password_digest.to_ascii_lowercase())
            .map(|account| account.user.clone()))
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.ensure_open()?;
        let mut products: Vec<Product> = self.products.iter().map(|e| e.value().clone()).collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn get_product(&self, id: u64) -> Result<Product, StoreError> {
        self.ensure_open()?;
        self.products
            .get(&id)
            .map(|p| p.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn insert_product(&self, mut product: Product) -> Result<Product, StoreError> {
        self.ensure_open()?;
        product.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: u64, mut product: Product) -> Result<Product, StoreError> {
        self.ensure_open()?;
        let mut entry = self.products.get_mut(&id).ok_or(StoreError::NotFound)?;
        product.id = id;
        *entry = product.clone();
        Ok(product)
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.products.clear();
            tracing::info!("Data store closed");
        }
    }
}
