//! Remote catalog service integration.
//!
//! This module provides the client for the bulk catalog endpoint and the
//! two-stage detail fetch (metadata record, then sprite asset). It performs
//! no caching; cache-aside is the model's responsibility.

mod pokeapi;
mod types;

pub use pokeapi::{PokeApiClient, PokeApiConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote catalog service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP transport failed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response payload.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Trait for catalog service clients.
///
/// Implemented by [`PokeApiClient`] and by the test double in
/// [`crate::testing`], so the model can be driven without a network.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the full entry set in one bulk request. All-or-nothing: either
    /// the whole catalog parses or an error is returned.
    async fn fetch_catalog(&self) -> Result<Catalog, ServiceError>;

    /// Resolve a detail record at `url`: fetch the metadata record, then the
    /// sprite asset it points at. No partial detail is ever produced.
    async fn fetch_detail(&self, url: &str) -> Result<Detail, ServiceError>;
}
