//! Request-capture gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ correlation id ──▶ ingest pipeline
//!                                                         │    │    │
//!                                       extension check ◀─┘    │    └─▶ header filter
//!                                       file store      ◀──────┘
//!                                                              ▼
//!     Client Response                                     record store
//!     ◀────────────── {id, record} | {error} ◀─────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rq_gateway::config::load_config;
use rq_gateway::http::HttpServer;
use rq_gateway::lifecycle::{build_ingestor, forward_os_signals, Shutdown};
use rq_gateway::observability::{logging, metrics};

/// Capture HTTP requests into a record store.
#[derive(Debug, Parser)]
#[command(name = "rq-gateway", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "RQ_CONFIG", default_value = "config.toml")]
    config: PathBuf,

    /// Profile to load from the configuration file.
    #[arg(short, long, env = "RQ_PROFILE", default_value = "default")]
    profile: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config, &cli.profile)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        profile = %cli.profile,
        "rq-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        permitted_extensions = %config.files.permitted_extensions,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let ingestor = Arc::new(build_ingestor(&config).await?);
    let server = HttpServer::new(&config, ingestor);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    forward_os_signals(shutdown.clone());
    server.run(listener, shutdown.signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
