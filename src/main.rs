//! Provisioning API server.
//!
//! Least-privilege host API for PA lifecycle management. Exposes the
//! lifecycle script and reverse-proxy route files over a narrow HTTP surface
//! so an orchestrator can provision PAs without shell access to the host.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                 PROVISIONING API                      │
//!   Orchestrator       │  ┌──────────┐   ┌─────────┐   ┌─────────┐            │
//!   ───────────────────┼─▶│ security │──▶│ routing │──▶│  http   │            │
//!   (127.0.0.1 only)   │  │  bearer  │   │  table  │   │handlers │            │
//!                      │  └──────────┘   └─────────┘   └────┬────┘            │
//!                      │                                    │                 │
//!                      │                     ┌──────────────┼──────────────┐  │
//!                      │                     ▼              ▼              │  │
//!                      │              ┌────────────┐  ┌────────────┐       │  │
//!                      │              │ validation │  │   caddy    │───────┼──┼──▶ sites/<name>.caddy
//!                      │              └────────────┘  │   writer   │       │  │
//!                      │                              └─────┬──────┘       │  │
//!                      │                                    ▼              ▼  │
//!                      │                              ┌──────────────────────┐│
//!                      │                              │ process (no shell)   ││──▶ pactl.sh / caddy reload
//!                      │                              └──────────────────────┘│
//!                      │  observability: one redacted access line per request │
//!                      └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```text
//! PROVISION_API_TOKEN=<token> provisioning-api
//! PROVISION_API_TOKEN=<token> provisioning-api --port 9100 --config /etc/provisioning-api.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use provisioning_api::config::loader;
use provisioning_api::lifecycle::{wait_for_signal, Shutdown};
use provisioning_api::observability::{logging, metrics};
use provisioning_api::ApiServer;

#[derive(Parser)]
#[command(name = "provisioning-api")]
#[command(about = "Least-privilege host API for PA lifecycle management", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides PROVISION_API_PORT and the config file).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = loader::Overrides { port: cli.port };
    let config = match loader::load(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };

    logging::init(&config.observability);
    tracing::info!("provisioning-api v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    let server = ApiServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
