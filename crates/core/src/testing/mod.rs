//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the service and store
//! traits, allowing the model to be exercised without a network or a disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use pokedex_core::testing::{fixtures, MockCatalogService, MockCatalogStore};
//!
//! let store = MockCatalogStore::new();
//! let service = MockCatalogService::new();
//!
//! // Configure mock responses
//! service.set_catalog(fixtures::catalog(&["bulbasaur", "charmander"])).await;
//!
//! // Use in a CatalogModel...
//! ```

mod mock_service;
mod mock_store;

pub use mock_service::{MockCatalogService, RecordedServiceCall};
pub use mock_store::{MockCatalogStore, RecordedStoreOp};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::service::{Catalog, Detail, Entry};

    /// Locator a test entry pretends to live at.
    pub fn entry_url(name: &str) -> String {
        format!("https://pokeapi.co/api/v2/pokemon/{name}/")
    }

    /// Create a test entry with its canonical test locator.
    pub fn entry(name: &str) -> Entry {
        Entry::new(name, entry_url(name))
    }

    /// Create a test catalog from a list of names.
    pub fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|n| entry(n)).collect())
    }

    /// Create a test detail with reasonable defaults.
    pub fn detail(name: &str) -> Detail {
        Detail {
            name: name.to_string(),
            display_name: entry(name).display_text(),
            height: 7,
            types: vec!["grass".to_string(), "poison".to_string()],
            sprite: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }
}
