//! Metrics collection module
//!
//! Tracks search volume, failures, and product mutations.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters shared by the service and the stats endpoint
#[derive(Debug, Default)]
pub struct Metrics {
    searches: AtomicU64,
    failed_searches: AtomicU64,
    products_returned: AtomicU64,
    products_created: AtomicU64,
    products_updated: AtomicU64,
    products_deleted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed search and how many rows it returned
    pub fn record_search(&self, results: usize) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.products_returned
            .fetch_add(results as u64, Ordering::Relaxed);
    }

    /// Record a search that ended in an error
    pub fn record_failed_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.failed_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_created(&self) {
        self.products_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_updated(&self) {
        self.products_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self) {
        self.products_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Percentage of searches that succeeded
    pub fn reliability(&self) -> f64 {
        let (total, failed) = self.search_counts();
        reliability(total, failed)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let (searches, failed_searches) = self.search_counts();
        MetricsSnapshot {
            searches,
            failed_searches,
            products_returned: self.products_returned.load(Ordering::Relaxed),
            products_created: self.products_created.load(Ordering::Relaxed),
            products_updated: self.products_updated.load(Ordering::Relaxed),
            products_deleted: self.products_deleted.load(Ordering::Relaxed),
            reliability: reliability(searches, failed_searches),
        }
    }

    /// Total and failed search counts; a racing failure may be seen in
    /// `failed` before `total`, so callers must not assume `failed <= total`
    fn search_counts(&self) -> (u64, u64) {
        let failed = self.failed_searches.load(Ordering::Relaxed);
        let total = self.searches.load(Ordering::Relaxed);
        (total, failed)
    }
}

fn reliability(total: u64, failed: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let ratio = total.saturating_sub(failed) as f64 / total as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub failed_searches: u64,
    pub products_returned: u64,
    pub products_created: u64,
    pub products_updated: u64,
    pub products_deleted: u64,
    pub reliability: f64,
}
