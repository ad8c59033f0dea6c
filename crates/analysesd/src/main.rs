//! analysesd - Analyses Server Daemon
//!
//! REST API for listing and deleting vehicle-listing analyses held in a
//! managed PostgREST backend.
//!
//! Usage:
//!   analysesd [OPTIONS]
//!
//! The store URL and service key come from `--store-url`/`--service-key`,
//! `SUPABASE_URL`/`SUPABASE_SERVICE_ROLE_KEY`, or the `[store]` section of
//! the config file. Startup fails if either is missing, unless `--memory`
//! is given.

mod cli;
mod config;

use std::path::Path;
use std::sync::Arc;

use analyses_api::{create_router, AppState};
use analyses_core::{AnalysisRecord, AnalysisStore, MemoryStore};
use analyses_store::RestStore;
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::config::{FileConfig, Settings, StoreSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "analysesd=info,analyses_api=info,analyses_store=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting analysesd");

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => {
            tracing::info!("Loading config from: {}", path.display());
            FileConfig::load(path)?
        }
        None => FileConfig::default(),
    };

    let settings = Settings::resolve(&cli, file).map_err(|e| {
        tracing::error!("Invalid configuration: {:#}", e);
        e
    })?;

    // Built once, shared by every request
    let store = create_store(&settings.store)?;
    tracing::info!(store = store.name(), "Store ready");

    let app = create_router(AppState::new(store));

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

fn create_store(settings: &StoreSettings) -> anyhow::Result<Arc<dyn AnalysisStore>> {
    match settings {
        StoreSettings::Rest(config) => {
            tracing::info!(
                url = %config.base_url,
                table = %config.table,
                timeout_secs = config.timeout.as_secs(),
                "Using REST store"
            );
            let store = RestStore::new(config.clone()).context("Failed to create REST store")?;
            Ok(Arc::new(store))
        }
        StoreSettings::Memory { seed } => {
            let store = match seed {
                Some(path) => MemoryStore::with_records(load_seed(path)?),
                None => MemoryStore::new(),
            };
            tracing::warn!(
                records = store.len(),
                "Using in-memory store; deletions are not persisted"
            );
            Ok(Arc::new(store))
        }
    }
}

/// Load a JSON array of records for the in-memory store
fn load_seed(path: &Path) -> anyhow::Result<Vec<AnalysisRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let records: Vec<AnalysisRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
