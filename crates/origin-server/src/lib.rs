//! Origin Server
//!
//! HTTP submission and query transport for the content anchor registry.
//! Submitters anchor fingerprints and derivatives; verifiers look them up.

#![warn(missing_docs)]

pub mod config;
pub mod conversions;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use origin_store::{Registry, RegistryError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Registry could not be opened
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured `log_level`.
pub fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the registry named by the configuration and wrap it in handler state
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    config.validate()?;
    let registry = Registry::open(&config.database_path, config.registry_config())?;

    Ok(AppState {
        registry: Arc::new(registry),
        default_page_size: config.default_page_size,
        max_page_size: config.max_page_size,
    })
}

/// Log every insertion event until the registry is dropped
///
/// Stands in for an external indexer; the stream is the same one indexers
/// subscribe to.
pub fn spawn_event_logger(registry: &Registry) -> tokio::task::JoinHandle<()> {
    let mut events = registry.subscribe();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => info!(
                    record_id = %event.record_id,
                    fingerprint = %event.fingerprint,
                    creator = %event.creator,
                    created_at = event.created_at,
                    is_original = event.is_original,
                    "anchor event"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event logger lagged, skipped {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Start the HTTP server
///
/// Opens the registry, starts the event logger and serves until the
/// listener fails.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Origin anchor server");
    info!("Bind address: {}", config.bind_addr());
    info!("Database: {}", config.database_path);

    let state = build_state(&config)?;
    info!("Anchored records: {}", state.registry.count());

    spawn_event_logger(&state.registry);

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
