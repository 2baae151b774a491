//! Testing utilities and a mock fetcher for exercising the search pipeline
//! without real upstream sources.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelhub_core::testing::{fixtures, MockFetcher};
//!
//! let fetcher = MockFetcher::new()
//!     .with_records("alpha", vec![fixtures::record("alpha", "1", "Lost")]);
//! let catalog = SourceCatalog::new(vec![fixtures::source("alpha")])?;
//! ```

mod mock_fetcher;

pub use mock_fetcher::{MockFetcher, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::SourceDescriptor;
    use crate::search::RawRecord;

    /// An enabled, non-adult source named after its code.
    pub fn source(code: &str) -> SourceDescriptor {
        SourceDescriptor {
            code: code.to_string(),
            name: format!("Source {}", code),
            endpoint: format!("http://{}.test/api.php/provide/vod/", code),
            enabled: true,
            adult: false,
        }
    }

    /// An adult-flagged source.
    pub fn adult_source(code: &str) -> SourceDescriptor {
        SourceDescriptor {
            adult: true,
            ..source(code)
        }
    }

    /// A disabled source.
    pub fn disabled_source(code: &str) -> SourceDescriptor {
        SourceDescriptor {
            enabled: false,
            ..source(code)
        }
    }

    /// A raw record with a poster and remarks derived from its id.
    pub fn record(source_code: &str, vod_id: &str, title: &str) -> RawRecord {
        RawRecord {
            source_code: source_code.to_string(),
            source_name: format!("Source {}", source_code),
            vod_id: vod_id.to_string(),
            title: title.to_string(),
            poster_url: format!("http://{}.test/poster/{}.jpg", source_code, vod_id),
            remarks: "HD".to_string(),
            type_name: "Movie".to_string(),
        }
    }
}
