//! RevHub Server: versioned file store with a filesystem mirror.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use revhub_api::AppState;
use revhub_core::config::{AppConfig, RecordBackend};
use revhub_core::error::AppError;
use revhub_database::{DatabasePool, MemoryRevisionStore, PgRevisionRepository, RevisionStore};
use revhub_service::VersioningService;
use revhub_storage::LocalMirror;

#[tokio::main]
async fn main() {
    let env = std::env::var("REVHUB_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting RevHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Record store ─────────────────────────────────────
    let (store, db_pool): (Arc<dyn RevisionStore>, Option<DatabasePool>) =
        match config.database.backend {
            RecordBackend::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    revhub_database::migration::run_migrations(pool.pool()).await?;
                }
                let repo = PgRevisionRepository::new(pool.pool().clone());
                (Arc::new(repo), Some(pool))
            }
            RecordBackend::Memory => {
                tracing::warn!("Using the in-memory record store; revisions are lost on exit");
                (Arc::new(MemoryRevisionStore::new()), None)
            }
        };

    // ── Step 2: Mirror ───────────────────────────────────────────
    let mirror = LocalMirror::new(&config.storage.root).await?;
    tracing::info!(root = %mirror.root().display(), "Mirror ready");

    // ── Step 3: Versioning engine ────────────────────────────────
    let versioning = VersioningService::new(store, Arc::new(mirror));

    if config.storage.reconcile_on_startup {
        let report = versioning.reconcile_all().await?;
        if !report.failed.is_empty() {
            tracing::warn!(
                failed = report.failed.len(),
                "Some mirror entries could not be rebuilt"
            );
        }
    }

    // ── Step 4: HTTP server ──────────────────────────────────────
    let result = revhub_api::run_server(AppState::new(config, versioning)).await;

    if let Some(pool) = db_pool {
        pool.close().await;
    }
    result
}
