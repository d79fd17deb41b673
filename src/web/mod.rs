//! Web server module
//!
//! Provides the JSON HTTP API for product search and management.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::SearchParams;
pub use routes::{create_router, PRODUCT_ENDPOINT, PRODUCT_ID_ENDPOINT, SEARCH_ENDPOINT};
pub use state::AppState;
