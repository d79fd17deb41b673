//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::search::{Product, Query as ProductQuery, SearchError};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Query parameters for proximity search
///
/// Values arrive as raw strings so missing and malformed numbers can be
/// reported separately.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Optional substring of the product name
    pub term: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    /// Radius in metres
    pub radius: Option<String>,
}

impl SearchParams {
    /// Parse into a search query; range checks happen in the service
    pub fn into_query(self) -> Result<ProductQuery, SearchError> {
        let lat = parse_number("lat", self.lat.as_deref())?;
        let lng = parse_number("lng", self.lng.as_deref())?;
        let radius = parse_number("radius", self.radius.as_deref())?;

        Ok(ProductQuery::new(lat, lng, radius).with_term(self.term.unwrap_or_default()))
    }
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<f64, SearchError> {
    match raw.map(str::trim) {
        None | Some("") => Err(SearchError::InputInvalid(format!("missing {}", name))),
        Some(value) => value
            .parse()
            .map_err(|_| SearchError::InputInvalid(format!("{} invalid value", name))),
    }
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("id not valid: {}", raw)))
}

/// Proximity search handler
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Query(params) = params.map_err(|e| {
        info!("Failed to read search parameters: {}", e);
        ApiError::bad_request(e.body_text())
    })?;

    let query = params.into_query().map_err(|e| {
        info!("Invalid search request: {}", e);
        ApiError::from(e)
    })?;

    match state.service.search(&query).await {
        Ok(products) => Ok(Json(products)),
        // No match is an empty result, not an error response
        Err(SearchError::NotFound) => Ok(Json(Vec::new())),
        Err(e) => Err(e.into()),
    }
}

/// Create a product
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(product) = body.map_err(|e| {
        info!("Failed to read product body: {}", e);
        ApiError::bad_request(e.body_text())
    })?;

    let created = state.service.create(product).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Fetch a product by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let product = state.service.get(id).await?;
    Ok(Json(product))
}

/// Replace a product; the id in the path wins over any id in the body
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Product>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let Json(mut product) = body.map_err(|e| {
        info!("Failed to read product body: {}", e);
        ApiError::bad_request(e.body_text())
    })?;

    if product.id != 0 && product.id != id {
        warn!("Body id {} ignored in favour of path id {}", product.id, id);
    }
    product.id = id;

    let updated = state.service.update(product).await?;
    Ok((StatusCode::ACCEPTED, Json(updated)).into_response())
}

/// Delete a product
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    debug!("Deleted product {}", id);
    Ok(StatusCode::OK)
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// Counters snapshot
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.service.metrics().snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(lat: Option<&str>, lng: Option<&str>, radius: Option<&str>) -> SearchParams {
        SearchParams {
            term: None,
            lat: lat.map(String::from),
            lng: lng.map(String::from),
            radius: radius.map(String::from),
        }
    }

    #[test]
    fn test_into_query() {
        let mut p = params(Some("15"), Some("10"), Some("5"));
        p.term = Some("camera".to_string());
        let query = p.into_query().unwrap();
        assert_eq!(query, ProductQuery::new(15.0, 10.0, 5.0).with_term("camera"));
    }

    #[test]
    fn test_missing_and_malformed_values() {
        let err = params(None, Some("10"), Some("5")).into_query().unwrap_err();
        assert_eq!(err.to_string(), "input invalid: missing lat");

        let err = params(Some("15"), Some(""), Some("5")).into_query().unwrap_err();
        assert_eq!(err.to_string(), "input invalid: missing lng");

        let err = params(Some("15"), Some("10"), Some("far")).into_query().unwrap_err();
        assert_eq!(err.to_string(), "input invalid: radius invalid value");
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("99").unwrap(), 99);
        assert_eq!(parse_id("abc").unwrap_err().status, StatusCode::BAD_REQUEST);
        assert!(parse_id("-1").is_err());
    }
}
