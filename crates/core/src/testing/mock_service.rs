//! Mock catalog service for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::service::{Catalog, CatalogService, Detail, ServiceError};

/// A recorded service call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedServiceCall {
    FetchCatalog,
    FetchDetail { url: String },
}

/// Mock implementation of the [`CatalogService`] trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable catalog and details keyed by url
/// - Track calls for assertions
/// - Simulate failures and slow responses
pub struct MockCatalogService {
    /// The catalog returned by `fetch_catalog`.
    catalog: Arc<RwLock<Option<Catalog>>>,
    /// Details keyed by the url they are fetched from.
    details: Arc<RwLock<HashMap<String, Detail>>>,
    /// Recorded calls.
    calls: Arc<RwLock<Vec<RecordedServiceCall>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ServiceError>>>,
    /// Artificial delay before responding.
    response_delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockCatalogService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogService {
    /// Create a new empty mock service.
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(None)),
            details: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            response_delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the catalog returned by `fetch_catalog`.
    pub async fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = Some(catalog);
    }

    /// Add a detail fetched from `url`.
    pub async fn add_detail(&self, url: impl Into<String>, detail: Detail) {
        self.details.write().await.insert(url.into(), detail);
    }

    /// Make the next operation fail with `error`.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every response, to widen race windows in concurrency tests.
    pub async fn set_response_delay(&self, delay: Duration) {
        *self.response_delay.write().await = Some(delay);
    }

    /// All recorded calls, in order.
    pub async fn calls(&self) -> Vec<RecordedServiceCall> {
        self.calls.read().await.clone()
    }

    /// Total number of calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn simulate(&self, call: RecordedServiceCall) -> Result<(), ServiceError> {
        self.calls.write().await.push(call);

        let delay = *self.response_delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogService for MockCatalogService {
    async fn fetch_catalog(&self) -> Result<Catalog, ServiceError> {
        self.simulate(RecordedServiceCall::FetchCatalog).await?;

        self.catalog
            .read()
            .await
            .clone()
            .ok_or_else(|| ServiceError::NotFound("no catalog configured".to_string()))
    }

    async fn fetch_detail(&self, url: &str) -> Result<Detail, ServiceError> {
        self.simulate(RecordedServiceCall::FetchDetail {
            url: url.to_string(),
        })
        .await?;

        self.details
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_returns_configured_catalog_and_records_calls() {
        let service = MockCatalogService::new();
        service
            .set_catalog(fixtures::catalog(&["bulbasaur"]))
            .await;

        let catalog = service.fetch_catalog().await.unwrap();
        assert_eq!(catalog.entries.len(), 1);
        assert_eq!(service.calls().await, vec![RecordedServiceCall::FetchCatalog]);
    }

    #[tokio::test]
    async fn test_next_error_fires_once() {
        let service = MockCatalogService::new();
        service
            .set_catalog(fixtures::catalog(&["bulbasaur"]))
            .await;
        service
            .set_next_error(ServiceError::Api {
                status: 500,
                message: "boom".to_string(),
            })
            .await;

        assert!(service.fetch_catalog().await.is_err());
        assert!(service.fetch_catalog().await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_detail_url_is_not_found() {
        let service = MockCatalogService::new();
        let err = service.fetch_detail("https://nope/").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
