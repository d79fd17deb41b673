//! Product storage
//!
//! The [`ProductStore`] trait is the narrow interface the product service
//! talks to. Backends fold an ordered list of [`Predicate`]s into their own
//! query construction and run it as a single lookup.

mod memory;
mod predicate;
mod sqlite;

pub use memory::MemoryStore;
pub use predicate::Predicate;
pub use sqlite::SqliteStore;

use crate::search::Product;
use async_trait::async_trait;
use thiserror::Error;

/// Storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage task failed: {0}")]
    Task(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence capability consumed by the product service
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Backend name used in logs
    fn name(&self) -> &str;

    /// Apply every predicate (logical AND) and return matching rows ordered by id
    async fn search(&self, predicates: &[Predicate]) -> Result<Vec<Product>>;

    /// Store a new product; the store assigns its id
    async fn create(&self, product: Product) -> Result<Product>;

    async fn get(&self, id: u64) -> Result<Product>;

    /// Replace the stored product that has `product.id`
    async fn update(&self, product: Product) -> Result<Product>;

    async fn delete(&self, id: u64) -> Result<()>;
}
