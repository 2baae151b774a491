//! Types for the source catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SourceConfig;

/// A configured content source. Read-only once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Unique, non-empty source code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// API endpoint queried by the fetcher.
    pub endpoint: String,
    pub enabled: bool,
    /// Whether this source serves adult content.
    pub adult: bool,
}

impl SourceDescriptor {
    /// Whether a query with the given adult flag may use this source.
    pub fn is_eligible(&self, include_adult: bool) -> bool {
        self.enabled && (include_adult || !self.adult)
    }
}

impl From<&SourceConfig> for SourceDescriptor {
    fn from(config: &SourceConfig) -> Self {
        Self {
            code: config.code.clone(),
            name: config.name.clone(),
            endpoint: config.url.clone(),
            enabled: config.enabled,
            adult: config.adult,
        }
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Duplicate source code: {0}")]
    DuplicateCode(String),

    #[error("Source '{0}' has an empty code")]
    EmptyCode(String),
}
