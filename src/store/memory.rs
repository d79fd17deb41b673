//! In-memory product store

use super::{Predicate, ProductStore, Result, StoreError};
use crate::search::Product;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Product store backed by an ordered map, for tests and ephemeral instances
pub struct MemoryStore {
    products: RwLock<BTreeMap<u64, Product>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored products
    pub fn len(&self) -> usize {
        self.products.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, predicates: &[Predicate]) -> Result<Vec<Product>> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;

        Ok(products
            .values()
            .filter(|product| predicates.iter().all(|p| p.matches(product)))
            .cloned()
            .collect())
    }

    async fn create(&self, mut product: Product) -> Result<Product> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;

        product.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: u64) -> Result<Product> {
        let products = self.products.read().map_err(|_| StoreError::Poisoned)?;
        products.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;

        match products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product)
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let mut products = self.products.write().map_err(|_| StoreError::Poisoned)?;
        products.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
