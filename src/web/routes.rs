//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const SEARCH_ENDPOINT: &str = "/q";
pub const PRODUCT_ENDPOINT: &str = "/product";
pub const PRODUCT_ID_ENDPOINT: &str = "/product/:id";

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(SEARCH_ENDPOINT, get(handlers::search))
        .route(PRODUCT_ENDPOINT, axum::routing::post(handlers::create))
        .route(
            PRODUCT_ID_ENDPOINT,
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        // Operational routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
