//! cheat-server
//!
//! Serves cheat sheets over HTTP to terminals (plain text) and browsers
//! (HTML).
//!
//! ```text
//!     Client ──▶ server (Axum, request ID, timeouts)
//!                  │
//!                  ▼
//!               handler ──▶ session memory, POST spool, legacy redirect
//!                  │
//!                  ├──▶ :shell-x/ ──▶ shell service (reverse proxy)
//!                  │
//!                  ├──▶ rate gate (queries with '+')
//!                  │
//!                  ▼
//!               resolver ──▶ corpus snapshot + keyword search
//!                  │
//!                  ▼
//!               audit log ──▶ html / text/plain response
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use cheat_server::config::{load_config, watcher::ConfigWatcher, ServerConfig};
use cheat_server::lifecycle::{spawn_signal_handler, Shutdown};
use cheat_server::observability::{logging::init_logging, metrics::init_metrics};
use cheat_server::HttpServer;

#[derive(Parser)]
#[command(name = "cheat-server")]
#[command(about = "Cheat sheet HTTP server", long_about = None)]
struct Cli {
    /// TOML configuration file; watched for changes when given
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding the configured bind address port
    #[arg(short, long, env = "CHEATSH_PORT")]
    port: Option<u16>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    init_logging(&config.observability.log_level, cli.debug);
    tracing::info!("cheat-server v{} starting", env!("CARGO_PKG_VERSION"));

    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run(config.clone())?))
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    if let Some(port) = cli.port {
        let mut addr: SocketAddr = config.server.bind_address.parse()?;
        addr.set_port(port);
        config.server.bind_address = addr.to_string();
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        corpus_root = %config.paths.corpus_root,
        search_limit = config.search.limit,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
