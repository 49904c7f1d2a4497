//! The catalog model - cache-aside orchestrator.
//!
//! Owns the in-memory entry list, its sectioned index, and the filtered
//! view, and drives the two read-through pipelines: the bulk catalog and
//! per-entry details. Local cache is checked first; a miss falls through to
//! the remote service and the result is written back. The registered
//! observer is notified of every async lifecycle edge.

mod events;

pub use events::{ModelEvent, ObserverHandle};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::index::{collation, section_index, CatalogIndex, IndexConfig, Section};
use crate::metrics;
use crate::service::{CatalogService, Entry, ServiceError};
use crate::store::CatalogStore;

/// View state derived from the entry list. Guarded by one lock so the
/// sections and the filtered view never disagree about the entries they
/// were built from.
#[derive(Default)]
struct ViewState {
    entries: Vec<Entry>,
    sections: Vec<Section>,
    filtered_sections: Vec<Section>,
    /// Folded search tokens currently applied to the filtered view.
    search_terms: Vec<String>,
}

impl ViewState {
    fn view(&self, filtering: bool) -> &[Section] {
        if filtering {
            &self.filtered_sections
        } else {
            &self.sections
        }
    }
}

/// The catalog model.
///
/// All collaborators are injected so tests can substitute fakes. State
/// mutation happens inside the view lock on the calling task; network and
/// storage awaits never hold it.
pub struct CatalogModel {
    store: Arc<dyn CatalogStore>,
    service: Arc<dyn CatalogService>,
    observer: ObserverHandle,
    index: CatalogIndex,
    header_threshold: usize,

    state: RwLock<ViewState>,
    catalog_loading: AtomicBool,
    /// Detail keys currently being fetched; duplicates collapse to a no-op.
    in_flight: Mutex<HashSet<String>>,
}

impl CatalogModel {
    /// Create a new model.
    pub fn new(
        store: Arc<dyn CatalogStore>,
        service: Arc<dyn CatalogService>,
        observer: ObserverHandle,
        index_config: IndexConfig,
    ) -> Self {
        Self {
            store,
            service,
            observer,
            header_threshold: index_config.header_threshold,
            index: CatalogIndex::new(&index_config),
            state: RwLock::new(ViewState::default()),
            catalog_loading: AtomicBool::new(false),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    // =========================================================================
    // Cache-aside operations
    // =========================================================================

    /// Load the catalog: adopt the persisted snapshot when one exists,
    /// otherwise fetch, adopt, and persist. A concurrent call while a fetch
    /// is in flight is collapsed to a no-op.
    pub async fn load_catalog(&self) {
        if self.catalog_loading.swap(true, Ordering::SeqCst) {
            debug!("catalog load already in flight, collapsing duplicate");
            return;
        }

        self.load_catalog_inner().await;
        self.catalog_loading.store(false, Ordering::SeqCst);
    }

    async fn load_catalog_inner(&self) {
        match self.store.load_catalog().await {
            Ok(Some(catalog)) => {
                debug!("catalog served from cache ({} entries)", catalog.entries.len());
                metrics::CATALOG_LOADS.with_label_values(&["cache"]).inc();
                self.adopt_entries(catalog.entries).await;
                return;
            }
            Ok(None) => {}
            Err(e) => warn!("failed to read cached catalog, treating as absent: {}", e),
        }

        self.observer.emit(ModelEvent::WillFetch).await;

        let started = Instant::now();
        match self.service.fetch_catalog().await {
            Ok(catalog) => {
                metrics::FETCH_DURATION
                    .with_label_values(&["catalog"])
                    .observe(started.elapsed().as_secs_f64());
                metrics::CATALOG_LOADS.with_label_values(&["network"]).inc();
                info!("catalog fetched ({} entries)", catalog.entries.len());

                self.adopt_entries(catalog.entries.clone()).await;

                if let Err(e) = self.store.save_catalog(&catalog).await {
                    warn!("failed to persist catalog, continuing unpersisted: {}", e);
                }

                self.observer
                    .emit(ModelEvent::DidFetch {
                        error: None,
                        reload: true,
                    })
                    .await;
            }
            Err(e) => {
                metrics::CATALOG_LOADS.with_label_values(&["error"]).inc();
                self.observer
                    .emit(ModelEvent::DidFetch {
                        error: Some(e),
                        reload: false,
                    })
                    .await;
            }
        }
    }

    /// Load the detail for `name`: serve the persisted record when one
    /// exists, otherwise run the two-stage fetch and persist the result.
    /// A duplicate call for a name already being fetched is a no-op.
    pub async fn load_detail(&self, name: &str) {
        match self.store.load_detail(name).await {
            Ok(Some(detail)) => {
                debug!("detail for {} served from cache", name);
                metrics::DETAIL_LOADS.with_label_values(&["cache"]).inc();
                self.observer.emit(ModelEvent::DetailReady(detail)).await;
                return;
            }
            Ok(None) => {}
            Err(e) => warn!(
                "failed to read cached detail for {}, treating as absent: {}",
                name, e
            ),
        }

        let Some(url) = self.resource_url(name).await else {
            warn!("detail requested for unknown entry {}", name);
            self.observer
                .emit(ModelEvent::DidFetch {
                    error: Some(ServiceError::NotFound(name.to_string())),
                    reload: false,
                })
                .await;
            return;
        };

        if !self.begin_detail_fetch(name).await {
            debug!("detail fetch for {} already in flight, collapsing duplicate", name);
            return;
        }

        self.fetch_detail(name, &url).await;
        self.end_detail_fetch(name).await;
    }

    /// Load the detail for the entry at a view position - the list-driven
    /// entry point (row tap).
    pub async fn load_detail_at(&self, section: usize, row: usize, filtering: bool) {
        let Some(entry) = self.entry_at(section, row, filtering).await else {
            warn!("no entry at section {} row {}", section, row);
            return;
        };

        self.load_detail(&entry.name).await;
    }

    async fn fetch_detail(&self, name: &str, url: &str) {
        self.observer.emit(ModelEvent::WillFetch).await;

        let started = Instant::now();
        match self.service.fetch_detail(url).await {
            Ok(detail) => {
                metrics::FETCH_DURATION
                    .with_label_values(&["detail"])
                    .observe(started.elapsed().as_secs_f64());
                metrics::DETAIL_LOADS.with_label_values(&["network"]).inc();

                if let Err(e) = self.store.save_detail(&detail).await {
                    warn!(
                        "failed to persist detail for {}, continuing unpersisted: {}",
                        name, e
                    );
                }

                self.observer
                    .emit(ModelEvent::DidFetch {
                        error: None,
                        reload: true,
                    })
                    .await;
                self.observer.emit(ModelEvent::DetailReady(detail)).await;
            }
            Err(e) => {
                metrics::DETAIL_LOADS.with_label_values(&["error"]).inc();
                self.observer
                    .emit(ModelEvent::DidFetch {
                        error: Some(e),
                        reload: false,
                    })
                    .await;
            }
        }
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Apply free search text to the filtered view: trimmed, whitespace
    /// tokenized, folded like collation keys. Every token must match.
    pub async fn set_search_text(&self, text: &str) {
        let terms: Vec<String> = text
            .split_whitespace()
            .map(collation::fold_key)
            .filter(|t| !t.is_empty())
            .collect();

        let mut state = self.state.write().await;
        let filtered = filter_sections(&state.sections, &terms);
        state.filtered_sections = filtered;
        state.search_terms = terms;
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// The entry at a position in the active view.
    pub async fn entry_at(&self, section: usize, row: usize, filtering: bool) -> Option<Entry> {
        let state = self.state.read().await;
        state.view(filtering).get(section)?.entries().get(row).cloned()
    }

    /// Number of sections in the active view.
    pub async fn section_count(&self, filtering: bool) -> usize {
        self.state.read().await.view(filtering).len()
    }

    /// Number of rows in one section of the active view (0 out of range).
    pub async fn rows_in_section(&self, section: usize, filtering: bool) -> usize {
        let state = self.state.read().await;
        state.view(filtering).get(section).map_or(0, Section::len)
    }

    /// Header title for a section, or `None` while the whole catalog is
    /// small enough that headers are suppressed.
    pub async fn header_title(&self, section: usize, filtering: bool) -> Option<String> {
        let state = self.state.read().await;
        if state.entries.len() <= self.header_threshold {
            return None;
        }

        state
            .view(filtering)
            .get(section)
            .map(|s| s.title().to_string())
    }

    /// Offset of the section carrying `title` in the active view, or
    /// `fallback` unchanged when no section currently does.
    pub async fn section_index(&self, title: &str, fallback: usize, filtering: bool) -> usize {
        let state = self.state.read().await;
        section_index(state.view(filtering), title, fallback)
    }

    /// Full title list for the index bar, empty letters included.
    pub fn section_index_titles(&self) -> Vec<String> {
        self.index.titles().to_vec()
    }

    /// Whether any entries are loaded at all.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Replace the entry list wholesale and rebuild both derived views.
    async fn adopt_entries(&self, entries: Vec<Entry>) {
        let sections = self.index.rebuild(&entries);

        let mut state = self.state.write().await;
        let filtered = filter_sections(&sections, &state.search_terms);
        state.entries = entries;
        state.sections = sections;
        state.filtered_sections = filtered;
    }

    async fn resource_url(&self, name: &str) -> Option<String> {
        let state = self.state.read().await;
        state
            .entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.url.clone())
    }

    async fn begin_detail_fetch(&self, name: &str) -> bool {
        self.in_flight.lock().await.insert(name.to_string())
    }

    async fn end_detail_fetch(&self, name: &str) {
        self.in_flight.lock().await.remove(name);
    }
}

fn filter_sections(sections: &[Section], terms: &[String]) -> Vec<Section> {
    if terms.is_empty() {
        return sections.to_vec();
    }

    sections.iter().filter_map(|s| s.filtered(terms)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockCatalogService, MockCatalogStore};

    fn model_with(
        store: Arc<MockCatalogStore>,
        service: Arc<MockCatalogService>,
    ) -> (CatalogModel, tokio::sync::mpsc::Receiver<ModelEvent>) {
        let (observer, rx) = ObserverHandle::channel(32);
        let model = CatalogModel::new(store, service, observer, IndexConfig::default());
        (model, rx)
    }

    #[tokio::test]
    async fn test_accessors_on_empty_model() {
        let (model, _rx) = model_with(
            Arc::new(MockCatalogStore::new()),
            Arc::new(MockCatalogService::new()),
        );

        assert!(model.is_empty().await);
        assert_eq!(model.section_count(false).await, 0);
        assert_eq!(model.rows_in_section(0, false).await, 0);
        assert!(model.entry_at(0, 0, false).await.is_none());
        assert!(model.header_title(0, false).await.is_none());
        assert_eq!(model.section_index("A", 7, false).await, 7);
        assert_eq!(model.section_index_titles().len(), 27);
    }

    #[tokio::test]
    async fn test_search_is_idempotent() {
        let store = Arc::new(MockCatalogStore::new());
        store
            .set_catalog(fixtures::catalog(&["bulbasaur", "charmander", "charizard"]))
            .await;
        let (model, _rx) = model_with(store, Arc::new(MockCatalogService::new()));
        model.load_catalog().await;

        model.set_search_text("char").await;
        let first = model.section_count(true).await;
        model.set_search_text("char").await;
        assert_eq!(model.section_count(true).await, first);
    }

    #[tokio::test]
    async fn test_search_tokens_fold_case_and_diacritics() {
        let store = Arc::new(MockCatalogStore::new());
        store
            .set_catalog(fixtures::catalog(&["Flabébé", "charmander"]))
            .await;
        let (model, _rx) = model_with(store, Arc::new(MockCatalogService::new()));
        model.load_catalog().await;

        model.set_search_text("  FLABÉ  ").await;
        assert_eq!(model.section_count(true).await, 1);
        assert_eq!(
            model.entry_at(0, 0, true).await.unwrap().name,
            "Flabébé"
        );
    }

    #[tokio::test]
    async fn test_filter_survives_catalog_adoption() {
        let store = Arc::new(MockCatalogStore::new());
        store.set_catalog(fixtures::catalog(&["bulbasaur"])).await;
        let (model, _rx) = model_with(store, Arc::new(MockCatalogService::new()));

        model.set_search_text("bulba").await;
        model.load_catalog().await;

        // The filtered view reflects the newly adopted entries.
        assert_eq!(model.section_count(true).await, 1);
    }
}
