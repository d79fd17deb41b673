//! Search and product operation errors

use crate::store::StoreError;
use thiserror::Error;

/// Outcome kinds surfaced to callers of the product service
#[derive(Error, Debug)]
pub enum SearchError {
    /// Malformed or missing request parameters
    #[error("input invalid: {0}")]
    InputInvalid(String),

    /// Storage reported no matching record
    #[error("product not found")]
    NotFound,

    /// Any other storage failure; the cause is kept for diagnostics
    #[error("request failed")]
    RequestFailed(#[source] StoreError),
}

impl SearchError {
    /// Classify a storage error, keeping `NotFound` distinct
    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::RequestFailed(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_classification() {
        assert!(SearchError::from_store(StoreError::NotFound).is_not_found());

        let err = SearchError::from_store(StoreError::Poisoned);
        assert!(matches!(err, SearchError::RequestFailed(_)));
        assert!(err.source().is_some());
    }
}
