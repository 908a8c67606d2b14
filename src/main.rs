//! plantcast - plant-health trend projection service
//!
//! # Usage
//!
//! ```bash
//! # Run with ./plantcast.toml (or built-in defaults)
//! cargo run --release
//!
//! # Explicit config, custom bind address
//! ./plantcast --config /etc/plantcast/plantcast.toml --addr 127.0.0.1:9000
//!
//! # Show the effective configuration and exit
//! ./plantcast --print-config
//! ```
//!
//! # Environment Variables
//!
//! - `PLANTCAST_CONFIG`: Path to the TOML config file
//! - `PLANTCAST_SERVER_ADDR`: Override the server bind address
//! - `PLANTCAST_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `PLANTCAST_RESET_DB`: Set to "true" to wipe the history store on startup
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use plantcast::api::{create_app, ApiState};
use plantcast::config::{defaults, ModelConfig, ServiceConfig, StorageBackend, StorageConfig};
use plantcast::{
    HistoryStore, InMemoryHistoryStore, LinearStatusModel, ProjectionEngine, SledHistoryStore,
    StatusClassifier, TierMap,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "plantcast")]
#[command(about = "Plant-health classification history and growth projection service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, env = defaults::SERVER_ADDR_ENV_VAR)]
    addr: Option<String>,

    /// Path to a TOML config file (skips the standard search order)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Wipe the sled history store on startup.
    /// WARNING: This is destructive and cannot be undone!
    #[arg(long, env = "PLANTCAST_RESET_DB")]
    reset_db: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

// ============================================================================
// Startup helpers
// ============================================================================

fn load_config(args: &CliArgs) -> Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ServiceConfig::load(),
    };
    if let Some(addr) = &args.addr {
        config.server.addr = addr.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Remove the sled history directory.
fn reset_history(storage: &StorageConfig) -> Result<()> {
    if storage.backend != StorageBackend::Sled {
        info!("In-memory history store, nothing to reset");
        return Ok(());
    }

    let path = Path::new(&storage.path);
    if !path.exists() {
        info!(path = %path.display(), "History store does not exist, nothing to reset");
        return Ok(());
    }

    warn!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    warn!("  RESET_DB - WIPING CLASSIFICATION HISTORY");
    warn!("  Removing: {}", path.display());
    warn!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    std::fs::remove_dir_all(path).context("Failed to remove history store")?;
    Ok(())
}

fn open_store(storage: &StorageConfig) -> Result<Arc<dyn HistoryStore>> {
    let store: Arc<dyn HistoryStore> = match storage.backend {
        StorageBackend::Sled => {
            if let Some(parent) = Path::new(&storage.path).parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            Arc::new(
                SledHistoryStore::open(&storage.path)
                    .with_context(|| format!("Failed to open history store at {}", storage.path))?,
            )
        }
        StorageBackend::Memory => {
            warn!("Using in-memory history store; records are lost on restart");
            Arc::new(InMemoryHistoryStore::new())
        }
    };
    Ok(store)
}

/// Load the classifier. A missing or broken model leaves the service up in
/// degraded mode: readings are refused, projections still served.
fn load_classifier(model: &ModelConfig) -> Option<Arc<dyn StatusClassifier>> {
    match LinearStatusModel::load(Path::new(&model.path)) {
        Ok(m) => Some(Arc::new(m)),
        Err(e) => {
            error!(
                path = %model.path,
                error = %e,
                "Status classifier unavailable; readings will be rejected"
            );
            None
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    // Reset BEFORE the store is opened
    if args.reset_db {
        reset_history(&config.storage)?;
    }

    let store = open_store(&config.storage)?;
    let classifier = load_classifier(&config.model);
    let tiers = Arc::new(TierMap::from_config(&config.tiers));
    if tiers.is_empty() {
        warn!("[tiers] is empty; every trend resolves to Unknown");
    }
    let engine = ProjectionEngine::new(store, classifier, tiers, &config.projection)
        .context("Invalid projection configuration")?;

    info!(
        store = engine.store().backend_name(),
        model = engine.model_name().unwrap_or("none"),
        trend_window = engine.trend_window(),
        max_horizon_months = engine.max_horizon_months(),
        "Projection engine ready"
    );
    if config.projection.seed.is_some() {
        warn!("projection.seed is set; every projection draws the same sequence");
    }

    let state = ApiState::new(Arc::new(engine), config.projection.seed);
    let app = create_app(state, &config.server);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;
    info!("HTTP server listening on {}", config.server.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("plantcast shutdown complete");
    Ok(())
}
