use reelhub_core::{Authenticator, Config, SanitizedConfig, SearchService, SourceCatalog};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    search: Arc<SearchService>,
    /// Cancelled when the server starts shutting down.
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        search: Arc<SearchService>,
    ) -> Self {
        Self {
            config,
            authenticator,
            search,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn search(&self) -> Arc<SearchService> {
        Arc::clone(&self.search)
    }

    pub fn catalog(&self) -> &SourceCatalog {
        self.search.catalog()
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}
