//! ailogistics-server - Account credential service for the AI logistics dashboard
//!
//! This is the main entry point for the ailogistics-server application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use ailogistics_server::auth::AccountService;
use ailogistics_server::config::Config;
use ailogistics_server::database::SqliteDatabase;
use ailogistics_server::logging::init_tracing;
use ailogistics_server::server::{AppState, Server};

/// ailogistics-server - Account credential service for the AI logistics dashboard
#[derive(Parser, Debug)]
#[command(name = "ailogistics-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "AILOGISTICS_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;

    init_tracing(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting ailogistics-server"
    );

    let database = Arc::new(SqliteDatabase::new(&config.database.path).await?);
    info!(path = %config.database.path, "Database initialized");

    let hasher = config.password.hasher()?;
    info!(
        algorithm = %hasher.algorithm(),
        bcrypt_cost = hasher.bcrypt_cost(),
        "Password hasher initialized"
    );

    let state = AppState {
        accounts: Arc::new(AccountService::new(Arc::clone(&database), hasher)?),
        expose_error_details: config.server.expose_error_details,
    };
    if config.server.expose_error_details {
        warn!("Internal error details will be included in registration responses");
    }

    let server = Server::new(config.server.clone(), state);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    let result = server.run(shutdown_signal()).await;

    match Arc::try_unwrap(database) {
        Ok(database) => {
            if let Err(e) = database.close().await {
                warn!(error = %e, "Failed to close database cleanly");
            }
        }
        Err(_) => warn!("Database still in use at shutdown, skipping close"),
    }

    info!("ailogistics-server shutdown complete");

    result.map_err(Into::into)
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => {
            // tracing is not initialized yet
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
        None => {
            eprintln!("Loading configuration from environment variables");
            Config::from_env().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
        }
    }
}

/// Create a future that resolves when a shutdown signal is received
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
