//! Product search module
//!
//! Turns proximity queries into storage predicates and classifies the
//! outcome, alongside the plain CRUD operations on products.

mod error;
mod models;
mod service;

pub use error::SearchError;
pub use models::*;
pub use service::ProductService;
