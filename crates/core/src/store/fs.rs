//! Filesystem-backed cache store: one JSON file per record.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::{CatalogStore, StoreError};
use crate::service::{Catalog, Detail};

const CATALOG_COLLECTION: &str = "catalog";
const DETAILS_COLLECTION: &str = "details";

/// Fixed key the single catalog snapshot is stored under.
const CATALOG_KEY: &str = "catalog";

/// JSON-file-per-key store rooted at a directory, with one subdirectory
/// per collection.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`. Directories are created on first
    /// write, so constructing the store never touches the disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, collection: &str, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(collection).join(format!("{key}.json")))
    }

    async fn write_json<T: Serialize>(
        &self,
        collection: &str,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let path = self.record_path(collection, key)?;
        let data = serde_json::to_vec(value).map_err(|e| StoreError::Encode(e.to_string()))?;

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, data).await?;

        debug!(collection, key, "record written");
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        let path = self.record_path(collection, key)?;

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let value = serde_json::from_slice(&data)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;

        Ok(Some(value))
    }
}

/// Keys become file names, so they must not traverse directories.
fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty()
        || key == ".."
        || key.contains(std::path::MAIN_SEPARATOR)
        || key.contains('/')
    {
        return Err(StoreError::InvalidKey(key.to_string()));
    }

    Ok(())
}

#[async_trait]
impl CatalogStore for FsStore {
    async fn save_catalog(&self, catalog: &Catalog) -> Result<(), StoreError> {
        self.write_json(CATALOG_COLLECTION, CATALOG_KEY, catalog)
            .await
    }

    async fn load_catalog(&self) -> Result<Option<Catalog>, StoreError> {
        self.read_json(CATALOG_COLLECTION, CATALOG_KEY).await
    }

    async fn save_detail(&self, detail: &Detail) -> Result<(), StoreError> {
        self.write_json(DETAILS_COLLECTION, &detail.name, detail)
            .await
    }

    async fn load_detail(&self, name: &str) -> Result<Option<Detail>, StoreError> {
        self.read_json(DETAILS_COLLECTION, name).await
    }
}

impl FsStore {
    /// Path the detail record for `name` lives at.
    pub fn detail_path(&self, name: &str) -> PathBuf {
        self.root.join(DETAILS_COLLECTION).join(format!("{name}.json"))
    }

    /// Path the catalog snapshot lives at.
    pub fn catalog_path(&self) -> PathBuf {
        self.root
            .join(CATALOG_COLLECTION)
            .join(format!("{CATALOG_KEY}.json"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Entry;
    use tempfile::TempDir;

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            Entry::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
            Entry::new("charmander", "https://pokeapi.co/api/v2/pokemon/4/"),
        ])
    }

    fn sample_detail(name: &str) -> Detail {
        Detail {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            height: 7,
            types: vec!["grass".to_string()],
            sprite: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_catalog_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        assert!(store.load_catalog().await.unwrap().is_none());

        let catalog = sample_catalog();
        store.save_catalog(&catalog).await.unwrap();

        let loaded = store.load_catalog().await.unwrap().unwrap();
        assert_eq!(loaded, catalog);
        assert!(store.catalog_path().is_file());
    }

    #[tokio::test]
    async fn test_detail_round_trip_one_file_per_name() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        store.save_detail(&sample_detail("bulbasaur")).await.unwrap();
        store.save_detail(&sample_detail("ivysaur")).await.unwrap();

        assert!(store.detail_path("bulbasaur").is_file());
        assert!(store.detail_path("ivysaur").is_file());

        let loaded = store.load_detail("bulbasaur").await.unwrap().unwrap();
        assert_eq!(loaded.name, "bulbasaur");
        assert!(store.load_detail("missingno").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        let mut detail = sample_detail("bulbasaur");
        store.save_detail(&detail).await.unwrap();

        detail.height = 10;
        store.save_detail(&detail).await.unwrap();

        let loaded = store.load_detail("bulbasaur").await.unwrap().unwrap();
        assert_eq!(loaded.height, 10);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error_not_absent() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        let path = store.catalog_path();
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, b"not json").await.unwrap();

        let result = store.load_catalog().await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_rejects_traversal_keys() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        for key in ["", "..", "a/b"] {
            let result = store.load_detail(key).await;
            assert!(
                matches!(result, Err(StoreError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }
}
