//! Prometheus metrics for the cache-aside pipeline.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Catalog loads by how they were served.
pub static CATALOG_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_catalog_loads_total", "Total catalog load operations"),
        &["source"], // "cache", "network", "error"
    )
    .unwrap()
});

/// Detail loads by how they were served.
pub static DETAIL_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_detail_loads_total", "Total detail load operations"),
        &["source"], // "cache", "network", "error"
    )
    .unwrap()
});

/// Remote fetch duration in seconds.
pub static FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_fetch_duration_seconds",
            "Duration of remote fetches",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"], // "catalog", "detail"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CATALOG_LOADS.clone()),
        Box::new(DETAIL_LOADS.clone()),
        Box::new(FETCH_DURATION.clone()),
    ]
}
