//! Deferred search filters

use crate::geo::BoundingBox;
use crate::search::Product;
use rusqlite::types::Value;

/// A filter applied by a store before it runs a search
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Latitude between the south and north corners, longitude between west and east
    SpatialBetween(BoundingBox),
    /// Substring match on the item name, ignoring ASCII case
    TextLike(String),
}

impl Predicate {
    pub fn spatial_between(bbox: BoundingBox) -> Self {
        Self::SpatialBetween(bbox)
    }

    pub fn text_like(term: impl Into<String>) -> Self {
        Self::TextLike(term.into())
    }

    /// Evaluate the predicate against an in-memory row
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::SpatialBetween(bbox) => bbox.contains(product.lat, product.lng),
            // ASCII-only folding, matching SQLite LIKE
            Self::TextLike(term) => product
                .item_name
                .to_ascii_lowercase()
                .contains(&term.to_ascii_lowercase()),
        }
    }

    /// SQL condition and its bound values, in placeholder order
    pub(crate) fn sql_condition(&self) -> (String, Vec<Value>) {
        match self {
            Self::SpatialBetween(bbox) => {
                let lng_condition = if bbox.crosses_antimeridian() {
                    "(lng > ? OR lng < ?)"
                } else {
                    "lng > ? AND lng < ?"
                };
                (
                    format!("lat > ? AND lat < ? AND {}", lng_condition),
                    vec![
                        Value::Real(bbox.south.lat),
                        Value::Real(bbox.north.lat),
                        Value::Real(bbox.west.lng),
                        Value::Real(bbox.east.lng),
                    ],
                )
            }
            Self::TextLike(term) => (
                "item_name LIKE ? ESCAPE '\\'".to_string(),
                vec![Value::Text(format!("%{}%", escape_like(term)))],
            ),
        }
    }
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
