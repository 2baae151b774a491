//! Aggregated video search.
//!
//! A search fans out to every eligible source concurrently ([`dispatch`]),
//! folds records with the same title into one item ([`merge`]) and orders
//! the result by relevance to the keyword ([`rank`]).

mod dispatch;
mod fetcher;
mod maccms;
mod merge;
mod rank;
mod service;
mod types;

pub use dispatch::dispatch;
pub use fetcher::SourceFetcher;
pub use maccms::MacCmsFetcher;
pub use merge::merge;
pub use rank::{rank, relevance_score};
pub use service::{SearchService, SearchSettings};
pub use types::*;
