//! geoproduct: location-aware product lookup service
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use geoproduct::{
    config::{self, Cli, Settings, StorageBackend},
    metrics::Metrics,
    store::{MemoryStore, ProductStore, SqliteStore},
    web::{create_router, AppState},
    ProductService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; --debug and GEOPRODUCT_DEBUG land in settings
    let settings = config::load(&cli)?;
    init_logging(settings.general.debug);

    info!("Starting geoproduct v{}", geoproduct::VERSION);
    match settings.source {
        Some(ref path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    // Open the product store
    let store = open_store(&settings)?;
    info!("Using {} product store", store.name());

    // Create application state
    let service = ProductService::with_metrics(store, Arc::new(Metrics::new()));
    let state = AppState::new(settings.clone(), service);

    // Create router
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Duration::from_secs(
            settings.server.shutdown_timeout,
        )))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Install the global tracing subscriber; `RUST_LOG` wins over `--debug`
fn init_logging(debug: bool) {
    let default = if debug { "geoproduct=debug,tower_http=debug" } else { "geoproduct=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn open_store(settings: &Settings) -> Result<Arc<dyn ProductStore>> {
    let storage = &settings.storage;
    match storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Sqlite => {
            let store = match storage.path {
                Some(ref path) => SqliteStore::open(path)?,
                None => SqliteStore::open_in_memory()?,
            };
            if storage.migrate {
                store.migrate()?;
            } else if storage.path.is_none() {
                warn!("In-memory SQLite database without migration has no items table");
            }
            Ok(Arc::new(store))
        }
    }
}

/// Resolve on Ctrl-C or SIGTERM, then give in-flight requests `grace` to finish
async fn shutdown_signal(grace: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down server..."),
        _ = terminate => info!("Received SIGTERM, shutting down server..."),
    }

    // Bound the drain so a stuck connection cannot hold the process open
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        warn!("Shutdown grace period of {:?} elapsed, exiting", grace);
        std::process::exit(0);
    });
}
