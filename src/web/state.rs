//! Application state shared across handlers

use crate::config::Settings;
use crate::search::ProductService;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Product search and CRUD
    pub service: Arc<ProductService>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, service: ProductService) -> Self {
        Self {
            settings: Arc::new(settings),
            service: Arc::new(service),
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
