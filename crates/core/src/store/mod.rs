//! Local cache persistence for the catalog snapshot and resolved details.
//!
//! The store is the cache-aside write-back target: one JSON record for the
//! whole catalog under a fixed key, one JSON record per resolved detail
//! keyed by entry name. Reads distinguish "absent" from "corrupt" so the
//! model can treat the latter as a miss.

mod fs;

pub use fs::FsStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::service::{Catalog, Detail};

/// Errors for cache store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record exists but could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// A record could not be encoded for writing.
    #[error("Failed to encode record: {0}")]
    Encode(String),

    /// The key cannot be used as a storage path component.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Trait for catalog cache storage.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist the catalog snapshot, overwriting any prior one.
    async fn save_catalog(&self, catalog: &Catalog) -> Result<(), StoreError>;

    /// Load the persisted catalog snapshot, or `None` if none exists.
    async fn load_catalog(&self) -> Result<Option<Catalog>, StoreError>;

    /// Persist a resolved detail under its entry name, overwriting any
    /// prior record for the same name.
    async fn save_detail(&self, detail: &Detail) -> Result<(), StoreError>;

    /// Load the persisted detail for `name`, or `None` if none exists.
    async fn load_detail(&self, name: &str) -> Result<Option<Detail>, StoreError>;
}
