//! Product and query data models

use super::error::SearchError;
use serde::{Deserialize, Serialize};

/// A stored product with its location
///
/// Field names on the wire follow the public JSON API, so `item_name`
/// travels as `description` and the URLs keep their upper-case suffix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Identifier assigned by storage on creation
    pub id: u64,
    /// Free-text product name matched by search terms
    #[serde(rename = "description")]
    pub item_name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "img_URL")]
    pub image_url: String,
    #[serde(rename = "product_URL")]
    pub product_url: String,
}

impl Product {
    /// Create a product that has not been stored yet
    pub fn new(item_name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            item_name: item_name.into(),
            lat,
            lng,
            ..Default::default()
        }
    }

    /// Set the image URL
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Set the product page URL
    pub fn with_product_url(mut self, url: impl Into<String>) -> Self {
        self.product_url = url.into();
        self
    }
}

/// A proximity search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Substring to match against product names; empty disables the text filter
    #[serde(default)]
    pub term: String,
    /// Centre latitude in degrees
    pub lat: f64,
    /// Centre longitude in degrees
    pub lng: f64,
    /// Search radius in metres
    pub radius: f64,
}

impl Query {
    /// Create a query without a text term
    pub fn new(lat: f64, lng: f64, radius: f64) -> Self {
        Self {
            term: String::new(),
            lat,
            lng,
            radius,
        }
    }

    /// Set the search term
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Whether a text filter applies
    pub fn has_term(&self) -> bool {
        !self.term.is_empty()
    }

    /// Reject coordinates and radii the geo math cannot use
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(SearchError::InputInvalid(format!(
                "lat out of range: {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(SearchError::InputInvalid(format!(
                "lng out of range: {}",
                self.lng
            )));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SearchError::InputInvalid(format!(
                "radius must be positive: {}",
                self.radius
            )));
        }
        Ok(())
    }
}
