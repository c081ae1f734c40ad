//! Round-robin HTTP load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 LOAD BALANCER                │
//!                      │                                              │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│ handler  │───▶│  pool   │  │
//!                      │  │ server  │    │ retry /  │    │ round   │  │
//!                      │  └─────────┘    │ failover │    │ robin   │  │
//!                      │                 └────┬─────┘    └────┬────┘  │
//!                      │                      │               │       │
//!   Client Response    │                      ▼               ▼       │
//!   ◀──────────────────┼──────────────── forward ◀──────── backend ◀──┼──── Upstream
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐  │
//!                      │  │ health monitor: TCP probe every N secs │  │
//!                      │  └────────────────────────────────────────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use lb_proxy::config::CliArgs;
use lb_proxy::lifecycle::Shutdown;
use lb_proxy::observability::logging;
use lb_proxy::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match CliArgs::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    tracing::info!(
        backends = config.backends.len(),
        port = config.port,
        health_check_interval_secs = config.health_check_interval_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    shutdown.trigger_on_signal();

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
