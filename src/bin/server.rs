//! Server binary: merges the data directory, then serves it until Ctrl-C.
//!
//! Configuration comes from the environment (or a `.env` file): HOST, PORT,
//! DATA_DIR, SNAPSHOT_PATH, STATIC_DIR. A missing data directory starts an empty store; an
//! unreadable one aborts startup.

use json_collections::{app, AppState, CollectionStore, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("json_collections=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let merger = config.merger();
    let outcome = merger.merge().await?;
    let store = CollectionStore::new(outcome.document);
    let state = AppState::new(store, merger).with_static_dir(config.static_dir.clone());

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        data_dir = %config.data_dir.display(),
        "listening"
    );
    for name in state.store.list_collections() {
        tracing::info!("  /api/{}", name);
    }

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
