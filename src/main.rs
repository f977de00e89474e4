//! Haiku timeline service (v1)
//!
//! Serves annotated timelines: for a screen name, fetch the user's recent
//! public posts, find the haikus in them and cache the result.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /{screen_name}
//!   ──────────────────▶ http (axum) ──▶ pipeline::Orchestrator
//!                                            │
//!                    ┌───────────────────────┼───────────────────────┐
//!                    ▼                       ▼                       ▼
//!              cache::ResultCache    timeline::client         haiku::annotate
//!              (TTL, versioned)      (rate limit, fetch)      (first match/post)
//!                    │                       │
//!                    ▼                       ▼
//!              MemoryCacheStore       remote timeline API
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use haiku_timeline::config::load_or_default;
use haiku_timeline::lifecycle::{signals, Shutdown};
use haiku_timeline::observability::{logging, metrics};
use haiku_timeline::HttpServer;

#[derive(Parser)]
#[command(name = "haiku-timeline")]
#[command(about = "Finds haikus in a user's recent public posts", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "HAIKU_TIMELINE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    tracing::info!("haiku-timeline v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        remote = %config.remote.base_url,
        fetch_count = config.remote.fetch_count,
        cache_ttl_secs = config.cache.ttl_secs,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        signal_shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
