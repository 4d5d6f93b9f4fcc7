//! One fetcher per backend resource.
//!
//! A fetcher issues one request and performs exactly one store write: the
//! decoded value on success, the resource's zero value on any failure. Errors
//! are logged here and go no further. There are no retries; the next refresh
//! tick is the retry.

use crate::api::{payload, Backend};
use crate::error::Result;
use crate::model::{
    Check, ConsolidatedSeries, MonitoredUrl, PerformanceSummary, Stats, SyntheticResult,
    SyntheticStats, SyntheticStep, SyntheticTest,
};
use crate::store::ViewStore;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[derive(Clone)]
pub struct Fetchers {
    backend: Arc<dyn Backend>,
    store: Arc<ViewStore>,
    history_limit: Option<u32>,
}

impl Fetchers {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<ViewStore>) -> Self {
        Self {
            backend,
            store,
            history_limit: None,
        }
    }

    pub fn with_history_limit(mut self, limit: Option<u32>) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn store(&self) -> &Arc<ViewStore> {
        &self.store
    }

    /// Fans out every fetcher that needs no selection. They run concurrently
    /// and independently; one failing does not affect the others.
    pub async fn refresh_all(&self) {
        futures::join!(
            self.fetch_urls(),
            self.fetch_stats(),
            self.fetch_consolidated(),
            self.fetch_performance(),
            self.fetch_synthetic_tests(),
            self.fetch_synthetic_stats()
        );
    }

    pub async fn fetch_urls(&self) {
        let urls: Vec<MonitoredUrl> = self.list("urls", "urls", "URLs").await;
        self.store.set_urls(urls);
    }

    pub async fn fetch_stats(&self) {
        let stats: Stats = self.record("stats", "stats", "statistics").await;
        self.store.set_stats(stats);
    }

    pub async fn fetch_consolidated(&self) {
        let path = overview_path(self.store.period_hours());
        let series: Vec<ConsolidatedSeries> =
            self.list(&path, "consolidated_data", "consolidated data").await;
        self.store.set_consolidated(series);
    }

    pub async fn fetch_performance(&self) {
        let path = overview_path(self.store.period_hours());
        // A bare array on this endpoint is consolidated data, so the key is required.
        let result = match self.backend.get(&path).await {
            Ok(value) => payload::decode_slice(value, "performance_summary"),
            Err(e) => Err(e),
        };
        let summaries: Vec<PerformanceSummary> = result.unwrap_or_else(|e| {
            log::warn!("Failed to fetch performance summary: {}", e);
            Vec::new()
        });
        self.store.set_performance(summaries);
    }

    pub async fn fetch_synthetic_tests(&self) {
        let tests: Vec<SyntheticTest> = self
            .list("synthetic-tests", "tests", "synthetic tests")
            .await;
        self.store.set_synthetic_tests(tests);
    }

    pub async fn fetch_synthetic_stats(&self) {
        let stats: SyntheticStats = self
            .record("synthetic-stats", "stats", "synthetic statistics")
            .await;
        self.store.set_synthetic_stats(stats);
    }

    pub async fn fetch_test_results(&self, test_id: u64) {
        let path = format!("synthetic-tests/{}/results", test_id);
        let results: Vec<SyntheticResult> = self.list(&path, "results", "test results").await;
        self.store.set_test_results(Some(test_id), results);
    }

    pub async fn fetch_result_steps(&self, test_id: u64, result_id: u64) {
        let path = format!("synthetic-tests/{}/results/{}/steps", test_id, result_id);
        let steps: Vec<SyntheticStep> = self.list(&path, "steps", "test steps").await;
        self.store.set_result_steps(Some(result_id), steps);
    }

    /// Loads a URL's check history and selects the URL. On failure both the
    /// history and the selection are cleared.
    pub async fn fetch_url_history(&self, url_id: u64) {
        let path = match self.history_limit {
            Some(limit) => format!("urls/{}/history?limit={}", url_id, limit),
            None => format!("urls/{}/history", url_id),
        };
        match self.try_list::<Check>(&path, "history").await {
            Ok(history) => self.store.set_url_history(Some(url_id), history),
            Err(e) => {
                log::warn!("Failed to fetch history for URL {}: {}", url_id, e);
                self.store.set_url_history(None, Vec::new());
            }
        }
    }

    async fn try_list<T: DeserializeOwned>(&self, path: &str, key: &str) -> Result<Vec<T>> {
        let value = self.backend.get(path).await?;
        payload::decode_list(value, key)
    }

    async fn list<T: DeserializeOwned>(&self, path: &str, key: &str, what: &str) -> Vec<T> {
        self.try_list(path, key).await.unwrap_or_else(|e| {
            log::warn!("Failed to fetch {}: {}", what, e);
            Vec::new()
        })
    }

    async fn record<T: DeserializeOwned + Default>(&self, path: &str, key: &str, what: &str) -> T {
        let result = match self.backend.get(path).await {
            Ok(value) => payload::decode_record(value, key),
            Err(e) => Err(e),
        };
        result.unwrap_or_else(|e| {
            log::warn!("Failed to fetch {}: {}", what, e);
            T::default()
        })
    }
}

fn overview_path(period_hours: u32) -> String {
    format!("overview?hours={}", period_hours)
}
