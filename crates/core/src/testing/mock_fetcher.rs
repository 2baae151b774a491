//! Mock source fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::SourceDescriptor;
use crate::search::{FetchError, RawRecord, SourceFetcher};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub source_code: String,
    pub keyword: String,
    /// Per-source timeout the dispatcher passed in.
    pub timeout: Duration,
}

/// Counts a hanging fetch whose future was dropped before completing.
struct AbandonGuard(Arc<AtomicUsize>);

impl Drop for AbandonGuard {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// What the mock does when asked for a given source.
#[derive(Debug, Clone)]
enum Behavior {
    Records(Vec<RawRecord>),
    DelayedRecords(Duration, Vec<RawRecord>),
    Error(FetchError),
    Hang,
    Panic,
}

/// Mock implementation of the SourceFetcher trait.
///
/// Behavior is configured per source code up front; sources without a
/// configured behavior return no records.
///
/// # Example
///
/// ```rust,ignore
/// use reelhub_core::testing::{fixtures, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_records("alpha", vec![fixtures::record("alpha", "1", "Lost")])
///     .with_error("beta", FetchError::Status(503))
///     .with_hang("gamma");
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    behaviors: HashMap<String, Behavior>,
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    abandoned: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `records` for `source_code`.
    pub fn with_records(mut self, source_code: &str, records: Vec<RawRecord>) -> Self {
        self.behaviors
            .insert(source_code.to_string(), Behavior::Records(records));
        self
    }

    /// Return `records` for `source_code` after sleeping for `delay`.
    pub fn with_delayed_records(
        mut self,
        source_code: &str,
        delay: Duration,
        records: Vec<RawRecord>,
    ) -> Self {
        self.behaviors.insert(
            source_code.to_string(),
            Behavior::DelayedRecords(delay, records),
        );
        self
    }

    /// Fail `source_code` with `error`.
    pub fn with_error(mut self, source_code: &str, error: FetchError) -> Self {
        self.behaviors
            .insert(source_code.to_string(), Behavior::Error(error));
        self
    }

    /// Never complete a fetch for `source_code`.
    pub fn with_hang(mut self, source_code: &str) -> Self {
        self.behaviors
            .insert(source_code.to_string(), Behavior::Hang);
        self
    }

    /// Panic inside the fetch for `source_code`.
    pub fn with_panic(mut self, source_code: &str) -> Self {
        self.behaviors
            .insert(source_code.to_string(), Behavior::Panic);
        self
    }

    /// Get all recorded fetches, in the order they started.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Number of hanging fetches that were dropped by their caller.
    pub fn abandoned_fetches(&self) -> usize {
        self.abandoned.load(Ordering::SeqCst)
    }

    /// Clear recorded fetches.
    pub async fn clear_fetches(&self) {
        self.fetches.write().await.clear();
    }
}

#[async_trait]
impl SourceFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(
        &self,
        source: &SourceDescriptor,
        keyword: &str,
        timeout: Duration,
    ) -> Result<Vec<RawRecord>, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            source_code: source.code.clone(),
            keyword: keyword.to_string(),
            timeout,
        });

        match self.behaviors.get(&source.code) {
            None => Ok(Vec::new()),
            Some(Behavior::Records(records)) => Ok(records.clone()),
            Some(Behavior::DelayedRecords(delay, records)) => {
                tokio::time::sleep(*delay).await;
                Ok(records.clone())
            }
            Some(Behavior::Error(error)) => Err(error.clone()),
            Some(Behavior::Hang) => {
                let _abandoned = AbandonGuard(self.abandoned.clone());
                std::future::pending().await
            }
            Some(Behavior::Panic) => panic!("mock fetcher panic for source '{}'", source.code),
        }
    }
}
