//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Per-source fetches (outcome, latency)
//! - Aggregated searches (outcome, latency, result counts)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Source Fetch Metrics
// =============================================================================

/// Source fetches total by source and result.
pub static SOURCE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelhub_source_fetches_total", "Total per-source fetches"),
        &["source", "result"], // result: "success", "error", "timeout", "cancelled"
    )
    .unwrap()
});

/// Source fetch duration in seconds.
pub static SOURCE_FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reelhub_source_fetch_duration_seconds",
            "Duration of a single source fetch",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Search Metrics
// =============================================================================

/// Aggregated searches by result.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("reelhub_searches_total", "Total aggregated searches"),
        &["result"], // result: "ok", "cancelled", "rejected"
    )
    .unwrap()
});

/// Aggregated search duration in seconds.
pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "reelhub_search_duration_seconds",
            "Duration of an aggregated search, fan-out to ranking",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
    )
    .unwrap()
});

/// Merged items returned per search.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "reelhub_search_results",
            "Number of merged items returned per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SOURCE_FETCHES.clone()),
        Box::new(SOURCE_FETCH_DURATION.clone()),
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(SEARCH_RESULTS.clone()),
    ]
}
