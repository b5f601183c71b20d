//! flavormap-server - primary backend for FlavorMap
//!
//! Serves `/api/spots` (read + create), the `/data/spots.json` snapshot and
//! `/health`, backed by a SQLite file under the root folder.

use anyhow::{Context, Result};
use clap::Parser;
use flavormap_common::config::{resolve_root_folder, RootFolder, TomlConfig};
use flavormap_server::{build_router, db, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for flavormap-server
#[derive(Parser, Debug)]
#[command(name = "flavormap-server")]
#[command(about = "Primary spots backend for FlavorMap")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "FLAVORMAP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FLAVORMAP_PORT")]
    port: Option<u16>,

    /// Folder holding the database
    #[arg(short, long, env = "FLAVORMAP_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load();
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("flavormap_server={level},flavormap_common={level},tower_http={level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FlavorMap server v{}", env!("CARGO_PKG_VERSION"));

    let config = config.context("Failed to load configuration")?;
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);

    let root = RootFolder::new(resolve_root_folder(args.root_folder.as_deref(), &config));
    root.ensure_exists()
        .context("Failed to create root folder")?;
    let db_path = root.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match db::init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {:#}", e);
            return Err(e);
        }
    };

    let app = build_router(AppState::new(pool));

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("FlavorMap running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
