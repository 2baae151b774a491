//! Source catalog - the immutable set of configured content sources.
//!
//! A `SourceCatalog` is built once from validated configuration and handed to
//! every search as a cheap `Arc` snapshot, so queries never lock it.

mod types;

pub use types::*;

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::Config;

/// Immutable snapshot of all configured sources, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: Arc<[SourceDescriptor]>,
}

impl SourceCatalog {
    /// Build a catalog, rejecting duplicate or empty source codes.
    pub fn new(sources: Vec<SourceDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for source in &sources {
            if source.code.is_empty() {
                return Err(CatalogError::EmptyCode(source.name.clone()));
            }
            if !seen.insert(source.code.clone()) {
                return Err(CatalogError::DuplicateCode(source.code.clone()));
            }
        }

        Ok(Self {
            sources: sources.into(),
        })
    }

    /// Build a catalog from the `[[sources]]` section of the config.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        Self::new(
            config
                .sources
                .iter()
                .map(SourceDescriptor::from)
                .collect(),
        )
    }

    /// Sources with the enabled flag set.
    pub fn enabled_sources(&self) -> Vec<SourceDescriptor> {
        self.sources.iter().filter(|s| s.enabled).cloned().collect()
    }

    /// Look up a source by its code.
    pub fn source_by_code(&self, code: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.code == code)
    }

    /// Enabled sources a query may fan out to. Adult sources are excluded
    /// unless `include_adult` is set.
    pub fn eligible_sources(&self, include_adult: bool) -> Vec<SourceDescriptor> {
        self.sources
            .iter()
            .filter(|s| s.is_eligible(include_adult))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
