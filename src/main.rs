//! fetch-router server.
//!
//! Serves the static routes of a TOML configuration through a routed fetch.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ axum (request id, trace, timeout)
//!                          │
//!                          ▼
//!                      Fetch ──▶ Dispatcher ──▶ Router (method/protocol/hostname/path)
//!                                   │                 │
//!                                   │      match      ▼
//!                                   │◀──────── route handler
//!                                   │  none ──▶ not-found responder
//!                                   │  error ─▶ error responder
//!     Client Response               ▼
//!     ◀─────────────────────── Response<Body>
//!
//!     config watcher ──▶ rebuilt Fetch ──▶ atomic swap
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use fetch_router::config::loader::load_config;
use fetch_router::config::watcher::ConfigWatcher;
use fetch_router::config::ServerConfig;
use fetch_router::http::HttpServer;
use fetch_router::lifecycle::{signals, Shutdown};
use fetch_router::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "fetch-router")]
#[command(about = "Serve statically configured routes through a fetch router", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload routes when the configuration file changes.
    #[arg(short, long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!("fetch-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_on_signal(&signal_shutdown).await;
    });

    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
