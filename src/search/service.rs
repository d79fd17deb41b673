//! Product service: proximity search orchestration and CRUD

use super::error::SearchError;
use super::models::{Product, Query};
use crate::geo;
use crate::metrics::Metrics;
use crate::store::{Predicate, ProductStore};
use std::sync::Arc;
use tracing::{debug, error};

/// Coordinates product lookups against a storage backend
///
/// Holds no per-request state, so one instance serves any number of
/// concurrent callers. Every operation makes exactly one store call and
/// never retries.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    metrics: Arc<Metrics>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self::with_metrics(store, Arc::new(Metrics::new()))
    }

    pub fn with_metrics(store: Arc<dyn ProductStore>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Filters for a validated query: the search box, then the term if any
    pub fn predicates(query: &Query) -> Vec<Predicate> {
        let bbox = geo::bounding_box(query.lat, query.lng, query.radius);

        let mut predicates = vec![Predicate::spatial_between(bbox)];
        if query.has_term() {
            predicates.push(Predicate::text_like(query.term.clone()));
        }
        predicates
    }

    /// Find products inside the query radius whose name contains the term
    pub async fn search(&self, query: &Query) -> Result<Vec<Product>, SearchError> {
        if let Err(e) = query.validate() {
            self.metrics.record_failed_search();
            return Err(e);
        }

        let predicates = Self::predicates(query);
        debug!(
            "Searching {} with {} predicates around ({}, {}) r={}m",
            self.store.name(),
            predicates.len(),
            query.lat,
            query.lng,
            query.radius
        );

        match self.store.search(&predicates).await {
            Ok(products) => {
                self.metrics.record_search(products.len());
                Ok(products)
            }
            Err(e) => {
                self.metrics.record_failed_search();
                let err = SearchError::from_store(e);
                if let SearchError::RequestFailed(ref cause) = err {
                    error!("Failed to search products: {}", cause);
                }
                Err(err)
            }
        }
    }

    pub async fn create(&self, product: Product) -> Result<Product, SearchError> {
        match self.store.create(product).await {
            Ok(created) => {
                self.metrics.record_created();
                debug!("Created product {}", created.id);
                Ok(created)
            }
            Err(e) => {
                error!("Failed to create product: {}", e);
                Err(SearchError::RequestFailed(e))
            }
        }
    }

    pub async fn get(&self, id: u64) -> Result<Product, SearchError> {
        self.store
            .get(id)
            .await
            .map_err(|e| Self::classify("get", e))
    }

    pub async fn update(&self, product: Product) -> Result<Product, SearchError> {
        let updated = self
            .store
            .update(product)
            .await
            .map_err(|e| Self::classify("update", e))?;
        self.metrics.record_updated();
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<(), SearchError> {
        self.store
            .delete(id)
            .await
            .map_err(|e| Self::classify("delete", e))?;
        self.metrics.record_deleted();
        Ok(())
    }

    fn classify(operation: &str, err: crate::store::StoreError) -> SearchError {
        let err = SearchError::from_store(err);
        if let SearchError::RequestFailed(ref cause) = err {
            error!("Failed to {} product: {}", operation, cause);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Result as StoreResult, StoreError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const LONDON: (f64, f64) = (51.509865, -0.118092);
    const PARIS: (f64, f64) = (48.864716, 2.349014);

    /// Store double that records predicate lists and returns a canned outcome
    struct RecordingStore {
        calls: Mutex<Vec<Vec<Predicate>>>,
        outcome: fn() -> StoreResult<Vec<Product>>,
    }

    impl RecordingStore {
        fn new(outcome: fn() -> StoreResult<Vec<Product>>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                outcome,
            })
        }

        fn calls(&self) -> Vec<Vec<Predicate>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductStore for RecordingStore {
        fn name(&self) -> &str {
            "recording"
        }

        async fn search(&self, predicates: &[Predicate]) -> StoreResult<Vec<Product>> {
            self.calls.lock().unwrap().push(predicates.to_vec());
            (self.outcome)()
        }

        async fn create(&self, _product: Product) -> StoreResult<Product> {
            Err(StoreError::Task("create unavailable".to_string()))
        }

        async fn get(&self, _id: u64) -> StoreResult<Product> {
            Err(StoreError::NotFound)
        }

        async fn update(&self, _product: Product) -> StoreResult<Product> {
            Err(StoreError::Poisoned)
        }

        async fn delete(&self, _id: u64) -> StoreResult<()> {
            Err(StoreError::NotFound)
        }
    }

    fn london_products() -> StoreResult<Vec<Product>> {
        Ok(vec![
            Product::new("Canon 50mm f/1.2 Prime Lens", LONDON.0, LONDON.1),
            Product::new("Go Pro Hero - Full HD", LONDON.0, LONDON.1),
        ])
    }

    async fn seeded_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        for product in [
            Product::new("camera london", LONDON.0, LONDON.1),
            Product::new("camera bag", LONDON.0 + 0.1, LONDON.1 - 0.1),
            Product::new("Camera strap", LONDON.0 - 0.2, LONDON.1 + 0.2),
            Product::new("tripod", LONDON.0, LONDON.1),
            Product::new("camera paris", PARIS.0, PARIS.1),
        ] {
            store.create(product).await.unwrap();
        }
        store
    }

    async fn seeded_service() -> ProductService {
        ProductService::new(seeded_store().await)
    }

    #[tokio::test]
    async fn test_search_without_term_sends_one_predicate() {
        let store = RecordingStore::new(london_products);
        let service = ProductService::new(store.clone());

        let products = service
            .search(&Query::new(LONDON.0, LONDON.1, 5.0))
            .await
            .unwrap();
        assert_eq!(products.len(), 2);

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![Predicate::spatial_between(geo::bounding_box(
                LONDON.0, LONDON.1, 5.0
            ))]
        );
    }

    #[tokio::test]
    async fn test_search_with_term_appends_text_predicate() {
        let store = RecordingStore::new(london_products);
        let service = ProductService::new(store.clone());

        service
            .search(&Query::new(LONDON.0, LONDON.1, 5.0).with_term("canon"))
            .await
            .unwrap();

        let calls = store.calls();
        assert_eq!(calls[0].len(), 2);
        assert!(matches!(calls[0][0], Predicate::SpatialBetween(_)));
        assert_eq!(calls[0][1], Predicate::text_like("canon"));
    }

    #[tokio::test]
    async fn test_invalid_query_never_reaches_store() {
        let store = RecordingStore::new(london_products);
        let service = ProductService::new(store.clone());

        let err = service
            .search(&Query::new(LONDON.0, LONDON.1, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::InputInvalid(_)));
        assert!(store.calls().is_empty());
        assert_eq!(service.metrics().snapshot().failed_searches, 1);
    }

    #[tokio::test]
    async fn test_store_errors_are_classified() {
        let not_found = ProductService::new(RecordingStore::new(|| Err(StoreError::NotFound)));
        let err = not_found
            .search(&Query::new(LONDON.0, LONDON.1, 5.0))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let failing = ProductService::new(RecordingStore::new(|| {
            Err(StoreError::Task("connection reset".to_string()))
        }));
        let err = failing
            .search(&Query::new(LONDON.0, LONDON.1, 5.0))
            .await
            .unwrap_err();
        match err {
            SearchError::RequestFailed(StoreError::Task(msg)) => {
                assert_eq!(msg, "connection reset")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let service = ProductService::new(RecordingStore::new(|| Ok(vec![])));
        let products = service
            .search(&Query::new(LONDON.0, LONDON.1, 5.0))
            .await
            .unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_search() {
        let service = seeded_service().await;

        let products = service
            .search(&Query::new(LONDON.0, LONDON.1, 50_000.0).with_term("camera"))
            .await
            .unwrap();

        let names: Vec<_> = products.iter().map(|p| p.item_name.as_str()).collect();
        assert_eq!(names, vec!["camera london", "camera bag", "Camera strap"]);
    }

    #[tokio::test]
    async fn test_combined_search_is_intersection() {
        let store = seeded_store().await;
        let service = ProductService::new(store.clone());
        let spatial = service
            .search(&Query::new(LONDON.0, LONDON.1, 50_000.0))
            .await
            .unwrap();
        let combined = service
            .search(&Query::new(LONDON.0, LONDON.1, 50_000.0).with_term("camera"))
            .await
            .unwrap();
        let term_only = store
            .search(&[Predicate::text_like("camera")])
            .await
            .unwrap();

        assert!(combined.len() <= spatial.len().min(term_only.len()));
        for product in &combined {
            assert!(spatial.contains(product));
            assert!(term_only.contains(product));
        }
    }

    #[tokio::test]
    async fn test_search_is_idempotent() {
        let service = seeded_service().await;
        let query = Query::new(LONDON.0, LONDON.1, 50_000.0).with_term("camera");

        let first = service.search(&query).await.unwrap();
        let second = service.search(&query).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_crud_round_trip() {
        let service = seeded_service().await;

        let created = service
            .create(Product::new("lens", 1.0, 2.0))
            .await
            .unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(service.get(6).await.unwrap(), created);

        let renamed = Product {
            item_name: "Canon lens".to_string(),
            ..created
        };
        assert_eq!(service.update(renamed.clone()).await.unwrap(), renamed);

        service.delete(6).await.unwrap();
        assert!(service.get(6).await.unwrap_err().is_not_found());

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.products_created, 1);
        assert_eq!(snapshot.products_updated, 1);
        assert_eq!(snapshot.products_deleted, 1);
    }

    #[tokio::test]
    async fn test_crud_failures_are_classified() {
        let service = ProductService::new(RecordingStore::new(london_products));

        assert!(matches!(
            service.create(Product::default()).await,
            Err(SearchError::RequestFailed(_))
        ));
        assert!(service.get(1).await.unwrap_err().is_not_found());
        assert!(matches!(
            service.update(Product::default()).await,
            Err(SearchError::RequestFailed(StoreError::Poisoned))
        ));
        assert!(service.delete(1).await.unwrap_err().is_not_found());
    }
}
