//! Hospital operations record gateway.
//!
//! A single HTTP entry point in front of a shared document store: it
//! sanitizes input, guarantees a live store session per request, and
//! dispatches to the resource route groups mounted under `/api`.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                   GATEWAY                      │
//!                  │                                                │
//!   Client Request │  ┌──────────┐   ┌───────────┐   ┌──────────┐  │
//!   ───────────────┼─▶│ security │──▶│connection │──▶│ routing  │  │
//!                  │  │ pipeline │   │   gate    │   │  table   │  │
//!                  │  └──────────┘   └─────┬─────┘   └────┬─────┘  │
//!                  │                       │              │        │
//!                  │                       ▼              ▼        │
//!                  │                 ┌──────────┐   ┌──────────┐   │
//!                  │                 │  store   │   │ resource │   │
//!                  │                 │  cache   │   │  groups  │   │
//!                  │                 └────┬─────┘   └──────────┘   │
//!                  │                      │                        │
//!                  └──────────────────────┼────────────────────────┘
//!                                         ▼
//!                                  document store
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use opsgate::config::{self, GatewayConfig};
use opsgate::http::GatewayServer;
use opsgate::observability::{logging, metrics};
use opsgate::routing::{RouteTable, RESOURCE_PREFIXES};
use opsgate::store::{ConnectionCache, MongoConnector};

#[derive(Parser, Debug)]
#[command(name = "opsgate", about = "Hospital operations record gateway", version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long, env = "OPSGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config: GatewayConfig = config::load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_filter);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = config.environment.as_str(),
        store_configured = !config.store.uri.is_empty(),
        body_cap_bytes = config.limits.body_cap_bytes,
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

    let store = ConnectionCache::new(config.store.clone(), Box::new(MongoConnector));

    // Warm-up attempt so the first real request finds a live session. A
    // failure is logged, not fatal: the gate retries per request and the
    // health endpoint keeps answering either way.
    if let Err(e) = store.ensure().await {
        tracing::warn!(
            error = %e,
            "starting without a backing store session; gated routes answer 500 until one is established"
        );
    }

    // Resource route groups are external collaborators; until their crates
    // mount real routers here, every prefix answers with the uniform 404.
    let table = RouteTable::with_placeholders(RESOURCE_PREFIXES)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = GatewayServer::new(config, Arc::clone(&store), table);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
