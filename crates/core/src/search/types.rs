//! Types for the aggregated search pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A single search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text keyword.
    pub keyword: String,
    /// Whether adult sources may be queried.
    #[serde(default)]
    pub include_adult: bool,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, include_adult: bool) -> Self {
        Self {
            keyword: keyword.into(),
            include_adult,
        }
    }
}

/// One item as returned by a single source, before merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub source_code: String,
    pub source_name: String,
    /// The source's own identifier for this item.
    pub vod_id: String,
    pub title: String,
    pub poster_url: String,
    pub remarks: String,
    pub type_name: String,
}

impl RawRecord {
    pub fn provenance(&self) -> Provenance {
        Provenance {
            source_code: self.source_code.clone(),
            source_name: self.source_name.clone(),
            vod_id: self.vod_id.clone(),
        }
    }
}

/// Which source (and which of its records) contributed to a merged item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_code: String,
    pub source_name: String,
    pub vod_id: String,
}

/// A deduplicated search result, possibly offered by several sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedItem {
    /// Trimmed title, the merge key.
    pub title: String,
    pub poster_url: String,
    pub remarks: String,
    pub type_name: String,
    /// Contributing sources in the order they were merged.
    pub sources: Vec<Provenance>,
}

/// A source that contributed nothing because its fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source_code: String,
    pub error: String,
}

/// Everything collected by one fan-out.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// Records from all successful sources, in arrival order.
    pub records: Vec<RawRecord>,
    /// Codes of sources whose fetch succeeded.
    pub succeeded: Vec<String>,
    /// Sources whose fetch failed or timed out.
    pub failed: Vec<SourceFailure>,
}

/// Final result of an aggregated search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Merged items, best match first.
    pub items: Vec<MergedItem>,
    /// Number of sources the query fanned out to.
    pub sources_queried: usize,
    /// Sources that failed; empty when all succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_failed: Vec<SourceFailure>,
    /// How long the search took in milliseconds.
    pub duration_ms: u64,
}

/// Errors a single source fetch can end with.
///
/// These never escape a search; they are logged and the source contributes
/// zero records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Source timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Source reported an error: {0}")]
    Upstream(String),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FetchError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Cancelled => "cancelled",
            _ => "error",
        }
    }

    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Connection(_))
    }
}

/// Errors surfaced to the caller of a search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search keyword cannot be empty")]
    EmptyKeyword,

    #[error("Search cancelled")]
    Cancelled,
}
