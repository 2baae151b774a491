use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use reelhub_core::{
    config::config_path_from_env, create_authenticator, load_config_from_env, validate_config,
    Authenticator, MacCmsFetcher, SearchService, SearchSettings, SourceCatalog, SourceFetcher,
};
use reelhub_server::{api::create_router, state::AppState, telemetry::init_tracing};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be installed yet
        eprintln!("Fatal error: {:#}", e);
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load configuration
    let config = load_config_from_env().with_context(|| {
        format!("Failed to load config from {:?}", config_path_from_env())
    })?;

    // Initialize logging
    init_tracing(&config.log)?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!(
        "Auth: {}",
        if config.auth.enabled { "password" } else { "disabled" }
    );

    // Create authenticator
    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    // Build the source catalog
    let catalog = SourceCatalog::from_config(&config).context("Failed to build source catalog")?;
    info!(
        total = catalog.len(),
        enabled = catalog.enabled_sources().len(),
        "Source catalog initialized"
    );

    // Create fetcher and search service
    let fetcher: Arc<dyn SourceFetcher> = Arc::new(
        MacCmsFetcher::new(&config.search).context("Failed to create source fetcher")?,
    );
    let settings = SearchSettings::from(&config.search);
    info!(
        "Per-source timeout: {:?}, retries: {}",
        settings.per_source_timeout, config.search.retry
    );
    let search = Arc::new(SearchService::new(catalog, fetcher, settings));

    // Create app state
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, authenticator, search));
    let shutdown = state.shutdown_token().clone();

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM), then cancel in-flight searches.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Server shutting down...");
    shutdown.cancel();
}
