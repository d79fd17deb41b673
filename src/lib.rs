//! geoproduct: a location-aware product lookup service
//!
//! Products are stored with coordinates and found again by free-text term
//! and distance from a point. The [`geo`] module turns a centre and radius
//! into a search box, [`search`] turns a query into storage predicates, and
//! [`store`] backends apply them.

pub mod config;
pub mod geo;
pub mod metrics;
pub mod search;
pub mod store;
pub mod web;

pub use config::Settings;
pub use geo::{bounding_box, destination, BoundingBox, Point};
pub use search::{Product, ProductService, Query, SearchError};
pub use store::{MemoryStore, Predicate, ProductStore, SqliteStore, StoreError};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
