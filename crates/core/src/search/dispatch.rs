//! Concurrent fan-out of one query to many sources.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::SourceDescriptor;
use crate::metrics::{SOURCE_FETCHES, SOURCE_FETCH_DURATION};

use super::{
    DispatchReport, FetchError, RawRecord, SearchError, SearchQuery, SourceFailure, SourceFetcher,
};

/// Terminal state of one source's fetch.
struct SourceOutcome {
    source: SourceDescriptor,
    result: Result<Vec<RawRecord>, FetchError>,
    elapsed: Duration,
}

/// Fan `query` out to every source in `sources` and collect what comes back.
///
/// One worker task is spawned per source; all start immediately and report
/// exactly one outcome each over a shared channel. The call returns once every
/// worker has reported, so a slow source delays the whole query by at most
/// `per_source_timeout`.
///
/// A failing, timing out or panicking source is logged and contributes no
/// records; it never fails the dispatch. The only error is
/// [`SearchError::Cancelled`], returned after all workers have wound down
/// when `cancel` fires.
///
/// Sources that are not eligible for the query (disabled, or adult when the
/// query excludes adult content) are skipped before fan-out.
pub async fn dispatch(
    query: &SearchQuery,
    sources: &[SourceDescriptor],
    per_source_timeout: Duration,
    fetcher: Arc<dyn SourceFetcher>,
    cancel: &CancellationToken,
) -> Result<DispatchReport, SearchError> {
    let eligible: Vec<&SourceDescriptor> = sources
        .iter()
        .filter(|s| s.is_eligible(query.include_adult))
        .collect();

    if eligible.is_empty() {
        debug!(keyword = %query.keyword, "No eligible sources, nothing to dispatch");
        return Ok(DispatchReport::default());
    }

    let (tx, mut rx) = mpsc::channel::<SourceOutcome>(eligible.len());

    for source in eligible {
        let tx = tx.clone();
        let fetcher = Arc::clone(&fetcher);
        let source = source.clone();
        let keyword = query.keyword.clone();
        let cancel = cancel.clone();

        tokio::spawn(async move {
            debug!(source = %source.code, endpoint = %source.endpoint, "Requesting source");
            let started = Instant::now();
            let result = run_fetch(
                fetcher.as_ref(),
                &source,
                &keyword,
                per_source_timeout,
                &cancel,
            )
            .await;

            let outcome = SourceOutcome {
                source,
                result,
                elapsed: started.elapsed(),
            };
            // Only fails if the collector was dropped, in which case nobody
            // is waiting for this outcome anyway.
            let _ = tx.send(outcome).await;
        });
    }

    // The channel closes once the last worker drops its sender.
    drop(tx);

    let mut report = DispatchReport::default();
    while let Some(outcome) = rx.recv().await {
        let code = outcome.source.code;
        SOURCE_FETCH_DURATION
            .with_label_values(&[&code])
            .observe(outcome.elapsed.as_secs_f64());

        match outcome.result {
            Ok(mut records) => {
                info!(
                    source = %code,
                    count = records.len(),
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "Source returned results"
                );
                SOURCE_FETCHES.with_label_values(&[&code, "success"]).inc();
                report.records.append(&mut records);
                report.succeeded.push(code);
            }
            Err(e) => {
                warn!(source = %code, error = %e, "Source request failed");
                SOURCE_FETCHES.with_label_values(&[&code, e.kind()]).inc();
                report.failed.push(SourceFailure {
                    source_code: code,
                    error: e.to_string(),
                });
            }
        }
    }

    if cancel.is_cancelled() {
        info!(keyword = %query.keyword, "Search cancelled before completion");
        return Err(SearchError::Cancelled);
    }

    if report.succeeded.is_empty() {
        warn!(
            keyword = %query.keyword,
            failed = report.failed.len(),
            "All sources failed"
        );
    }

    Ok(report)
}

async fn run_fetch(
    fetcher: &dyn SourceFetcher,
    source: &SourceDescriptor,
    keyword: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<RawRecord>, FetchError> {
    let fetch = AssertUnwindSafe(fetcher.fetch(source, keyword, timeout)).catch_unwind();

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        result = tokio::time::timeout(timeout, fetch) => match result {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(FetchError::Internal(format!(
                "fetcher '{}' panicked",
                fetcher.name()
            ))),
            Err(_) => Err(FetchError::Timeout(timeout)),
        },
    }
}
