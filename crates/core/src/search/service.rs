//! The search entry point: validate, fan out, merge, rank.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::catalog::SourceCatalog;
use crate::config::SearchConfig;
use crate::metrics::{SEARCHES_TOTAL, SEARCH_DURATION, SEARCH_RESULTS};

use super::{dispatch, merge, rank, SearchError, SearchOutcome, SearchQuery, SourceFetcher};

/// Runtime knobs for [`SearchService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub per_source_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            per_source_timeout: config.timeout(),
        }
    }
}

/// Aggregated search over every eligible source in the catalog.
pub struct SearchService {
    catalog: SourceCatalog,
    fetcher: Arc<dyn SourceFetcher>,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(
        catalog: SourceCatalog,
        fetcher: Arc<dyn SourceFetcher>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            settings,
        }
    }

    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// Run one search.
    ///
    /// Source failures never fail the search; they show up in
    /// [`SearchOutcome::sources_failed`]. Errors are limited to an empty
    /// keyword and cancellation.
    pub async fn search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, SearchError> {
        let keyword = query.keyword.trim();
        if keyword.is_empty() {
            SEARCHES_TOTAL.with_label_values(&["rejected"]).inc();
            return Err(SearchError::EmptyKeyword);
        }
        let query = SearchQuery::new(keyword, query.include_adult);

        let started = Instant::now();
        let sources = self.catalog.eligible_sources(query.include_adult);

        info!(
            keyword = %query.keyword,
            include_adult = query.include_adult,
            sources = sources.len(),
            "Starting search"
        );

        let report = match dispatch(
            &query,
            &sources,
            self.settings.per_source_timeout,
            Arc::clone(&self.fetcher),
            cancel,
        )
        .await
        {
            Ok(report) => report,
            Err(e) => {
                SEARCHES_TOTAL.with_label_values(&["cancelled"]).inc();
                return Err(e);
            }
        };

        // Arrival order depends on network timing; merge in catalog-code order
        // so the representative record for a title is stable across runs.
        let mut records = report.records;
        records.sort_by(|a, b| a.source_code.cmp(&b.source_code));
        let raw_count = records.len();

        let items = rank(merge(records), &query.keyword);
        let elapsed = started.elapsed();

        SEARCHES_TOTAL.with_label_values(&["ok"]).inc();
        SEARCH_DURATION.observe(elapsed.as_secs_f64());
        SEARCH_RESULTS.observe(items.len() as f64);

        debug!(raw = raw_count, merged = items.len(), "Merged search results");
        info!(
            keyword = %query.keyword,
            results = items.len(),
            failed = report.failed.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Search completed"
        );

        Ok(SearchOutcome {
            items,
            sources_queried: sources.len(),
            sources_failed: report.failed,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
