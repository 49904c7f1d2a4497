//! Mock catalog store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::service::{Catalog, Detail};
use crate::store::{CatalogStore, StoreError};

/// A recorded store operation for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedStoreOp {
    SaveCatalog,
    LoadCatalog,
    SaveDetail { name: String },
    LoadDetail { name: String },
}

/// Mock in-memory implementation of the [`CatalogStore`] trait.
///
/// Provides controllable behavior for testing:
/// - Preload a catalog snapshot and details
/// - Track operations for assertions
/// - Simulate corrupt reads and unwritable media
pub struct MockCatalogStore {
    catalog: Arc<RwLock<Option<Catalog>>>,
    details: Arc<RwLock<HashMap<String, Detail>>>,
    ops: Arc<RwLock<Vec<RecordedStoreOp>>>,
    fail_reads: Arc<RwLock<bool>>,
    fail_writes: Arc<RwLock<bool>>,
}

impl Default for MockCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(RwLock::new(None)),
            details: Arc::new(RwLock::new(HashMap::new())),
            ops: Arc::new(RwLock::new(Vec::new())),
            fail_reads: Arc::new(RwLock::new(false)),
            fail_writes: Arc::new(RwLock::new(false)),
        }
    }

    /// Preload the persisted catalog snapshot.
    pub async fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = Some(catalog);
    }

    /// Preload a persisted detail.
    pub async fn set_detail(&self, detail: Detail) {
        self.details
            .write()
            .await
            .insert(detail.name.clone(), detail);
    }

    /// The currently persisted catalog, if any.
    pub async fn persisted_catalog(&self) -> Option<Catalog> {
        self.catalog.read().await.clone()
    }

    /// The currently persisted detail for `name`, if any.
    pub async fn persisted_detail(&self, name: &str) -> Option<Detail> {
        self.details.read().await.get(name).cloned()
    }

    /// Make every read fail as a corrupt record.
    pub async fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.write().await = fail;
    }

    /// Make every write fail as an unwritable medium.
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    /// All recorded operations, in order.
    pub async fn ops(&self) -> Vec<RecordedStoreOp> {
        self.ops.read().await.clone()
    }

    async fn check_read(&self, op: RecordedStoreOp) -> Result<(), StoreError> {
        self.ops.write().await.push(op);

        if *self.fail_reads.read().await {
            return Err(StoreError::Corrupt("injected read failure".to_string()));
        }

        Ok(())
    }

    async fn check_write(&self, op: RecordedStoreOp) -> Result<(), StoreError> {
        self.ops.write().await.push(op);

        if *self.fail_writes.read().await {
            return Err(StoreError::Io(std::io::Error::other(
                "injected write failure",
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn save_catalog(&self, catalog: &Catalog) -> Result<(), StoreError> {
        self.check_write(RecordedStoreOp::SaveCatalog).await?;
        *self.catalog.write().await = Some(catalog.clone());
        Ok(())
    }

    async fn load_catalog(&self) -> Result<Option<Catalog>, StoreError> {
        self.check_read(RecordedStoreOp::LoadCatalog).await?;
        Ok(self.catalog.read().await.clone())
    }

    async fn save_detail(&self, detail: &Detail) -> Result<(), StoreError> {
        self.check_write(RecordedStoreOp::SaveDetail {
            name: detail.name.clone(),
        })
        .await?;
        self.details
            .write()
            .await
            .insert(detail.name.clone(), detail.clone());
        Ok(())
    }

    async fn load_detail(&self, name: &str) -> Result<Option<Detail>, StoreError> {
        self.check_read(RecordedStoreOp::LoadDetail {
            name: name.to_string(),
        })
        .await?;
        Ok(self.details.read().await.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_round_trip_and_recorded_ops() {
        let store = MockCatalogStore::new();

        assert!(store.load_catalog().await.unwrap().is_none());

        store.save_catalog(&fixtures::catalog(&["bulbasaur"])).await.unwrap();
        assert_eq!(store.load_catalog().await.unwrap().unwrap().entries.len(), 1);

        let ops = store.ops().await;
        assert_eq!(
            ops,
            vec![
                RecordedStoreOp::LoadCatalog,
                RecordedStoreOp::SaveCatalog,
                RecordedStoreOp::LoadCatalog,
            ]
        );
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MockCatalogStore::new();
        store.set_detail(fixtures::detail("bulbasaur")).await;

        store.set_fail_reads(true).await;
        assert!(matches!(
            store.load_detail("bulbasaur").await,
            Err(StoreError::Corrupt(_))
        ));

        store.set_fail_reads(false).await;
        store.set_fail_writes(true).await;
        assert!(matches!(
            store.save_detail(&fixtures::detail("ivysaur")).await,
            Err(StoreError::Io(_))
        ));
        // The failed write left nothing behind.
        assert!(store.persisted_detail("ivysaur").await.is_none());
    }
}
