use async_trait::async_trait;
use std::time::Duration;

use crate::catalog::SourceDescriptor;

use super::{FetchError, RawRecord};

/// Queries one source for a keyword.
///
/// Implementations own the transport, response parsing and any retry policy.
/// The dispatcher additionally bounds every call by `timeout`.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetcher name for logging.
    fn name(&self) -> &str;

    /// Fetch the records `source` has for `keyword`.
    async fn fetch(
        &self,
        source: &SourceDescriptor,
        keyword: &str,
        timeout: Duration,
    ) -> Result<Vec<RawRecord>, FetchError>;
}
