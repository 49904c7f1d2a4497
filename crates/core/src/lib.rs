pub mod config;
pub mod index;
pub mod metrics;
pub mod model;
pub mod service;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, StorageConfig,
};
pub use index::{section_index, Alphabet, CatalogIndex, IndexConfig, Section};
pub use model::{CatalogModel, ModelEvent, ObserverHandle};
pub use service::{
    Catalog, CatalogService, Detail, Entry, PokeApiClient, PokeApiConfig, ServiceError,
};
pub use store::{CatalogStore, FsStore, StoreError};
