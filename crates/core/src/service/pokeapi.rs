//! PokeAPI client.
//!
//! PokeAPI asks clients to follow fair-use: identify yourself with a
//! User-Agent and keep request rates modest. The throttle here is client
//! side and optional (off by default).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::types::{capitalize, Catalog, Detail, Entry};
use super::{CatalogService, ServiceError};

/// PokeAPI client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokeApiConfig {
    /// Base URL (default: https://pokeapi.co/api/v2).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// User-Agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Size of the single bulk catalog page.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Minimum delay between requests in milliseconds (0 = no throttle).
    #[serde(default)]
    pub rate_limit_ms: u64,
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_user_agent() -> String {
    format!(
        "Pokedex/{} ( https://github.com/lelloman/pokedex )",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_page_limit() -> u32 {
    964
}

fn default_timeout() -> u64 {
    30
}

impl Default for PokeApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            page_limit: default_page_limit(),
            timeout_secs: default_timeout(),
            rate_limit_ms: 0,
        }
    }
}

/// PokeAPI client.
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    page_limit: u32,
    last_request: Arc<Mutex<Option<Instant>>>,
    rate_limit: Duration,
}

impl PokeApiClient {
    /// Create a new PokeAPI client.
    pub fn new(config: PokeApiConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            page_limit: config.page_limit,
            last_request: Arc::new(Mutex::new(None)),
            rate_limit: Duration::from_millis(config.rate_limit_ms),
        })
    }

    /// Wait for the configured minimum request interval if needed.
    async fn wait_for_rate_limit(&self) {
        if self.rate_limit.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.rate_limit {
                let wait_time = self.rate_limit - elapsed;
                debug!("PokeAPI rate limit: waiting {:?}", wait_time);
                sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// GET a URL with rate limiting and status triage.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ServiceError> {
        self.wait_for_rate_limit().await;

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if status == 404 {
            return Err(ServiceError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CatalogService for PokeApiClient {
    async fn fetch_catalog(&self) -> Result<Catalog, ServiceError> {
        let url = format!("{}/pokemon", self.base_url);

        debug!(limit = self.page_limit, "PokeAPI: fetching catalog");

        let response = self
            .get(
                &url,
                &[
                    ("offset", "0".to_string()),
                    ("limit", self.page_limit.to_string()),
                ],
            )
            .await?;

        let page: ApiCatalogPage = response.json().await.map_err(|e| {
            ServiceError::Parse(format!("Failed to parse catalog response: {e}"))
        })?;

        let entries = page.results.into_iter().map(Entry::from).collect();

        Ok(Catalog::new(entries))
    }

    async fn fetch_detail(&self, url: &str) -> Result<Detail, ServiceError> {
        debug!(url, "PokeAPI: fetching detail record");

        let response = self.get(url, &[]).await?;
        let record: ApiPokemon = response.json().await.map_err(|e| {
            ServiceError::Parse(format!("Failed to parse detail response: {e}"))
        })?;

        let sprite_url = record.sprite_url()?.to_string();

        debug!(url = %sprite_url, "PokeAPI: fetching sprite asset");

        let sprite = self
            .get(&sprite_url, &[])
            .await?
            .bytes()
            .await
            .map_err(ServiceError::Http)?
            .to_vec();

        Ok(record.into_detail(sprite))
    }
}

// ============================================================================
// PokeAPI Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiCatalogPage {
    #[serde(default)]
    results: Vec<ApiEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiEntry {
    name: String,
    url: String,
}

impl From<ApiEntry> for Entry {
    fn from(api: ApiEntry) -> Self {
        Entry::new(api.name, api.url)
    }
}

#[derive(Debug, Deserialize)]
struct ApiPokemon {
    name: String,
    height: u32,
    #[serde(default)]
    types: Vec<ApiTypeSlot>,
    sprites: ApiSprites,
}

#[derive(Debug, Deserialize)]
struct ApiTypeSlot {
    #[serde(default)]
    slot: u32,
    #[serde(rename = "type")]
    kind: ApiType,
}

#[derive(Debug, Deserialize)]
struct ApiType {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiSprites {
    #[serde(default)]
    front_default: Option<String>,
}

impl ApiPokemon {
    /// Locator of the sprite asset. A missing sprite makes the whole detail
    /// unusable, so it parses as an error.
    fn sprite_url(&self) -> Result<&str, ServiceError> {
        self.sprites
            .front_default
            .as_deref()
            .ok_or_else(|| {
                ServiceError::Parse(format!("detail record for {} has no sprite url", self.name))
            })
    }

    fn into_detail(mut self, sprite: Vec<u8>) -> Detail {
        self.types.sort_by_key(|t| t.slot);

        Detail {
            display_name: capitalize(&self.name),
            types: self.types.into_iter().map(|t| t.kind.name).collect(),
            name: self.name,
            height: self.height,
            sprite,
        }
    }
}
