//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe every backend with a bare TCP connect
//! - Mark each backend alive or dead from the probe result

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};
use url::Url;

use crate::load_balancer::{Backend, ServerPool};

/// Timeout for a single TCP probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Background prober updating backend liveness.
#[derive(Debug)]
pub struct HealthMonitor {
    pool: Arc<ServerPool>,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(pool: Arc<ServerPool>, interval: Duration) -> Self {
        Self { pool, interval }
    }

    /// Probe on every tick until `shutdown` fires.
    ///
    /// The first pass runs one interval after start. Passes run one at a
    /// time; ticks missed during a slow pass are skipped. Shutdown cuts a
    /// pass short.
    pub async fn run(self, shutdown: broadcast::Receiver<()>) {
        self.run_with(shutdown, |pool| async move { check_backends(pool.backends()).await })
            .await
    }

    async fn run_with<F, Fut>(self, mut shutdown: broadcast::Receiver<()>, pass: F)
    where
        F: Fn(Arc<ServerPool>) -> Fut,
        Fut: Future<Output = ()>,
    {
        if self.interval.is_zero() {
            tracing::warn!("Health check interval is zero, health monitor disabled");
            return;
        }

        tracing::info!(
            interval_secs = self.interval.as_secs_f64(),
            backends = self.pool.len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => break,
            }

            tracing::info!("Starting health check...");
            tokio::select! {
                _ = pass(self.pool.clone()) => tracing::info!("Health check completed"),
                _ = shutdown.recv() => {
                    tracing::info!("Health check interrupted");
                    break;
                }
            }
        }

        tracing::info!("Health monitor received shutdown signal, exiting loop");
    }
}

/// Probe every backend once, in order, and record the result.
pub async fn check_backends(backends: &[Arc<Backend>]) {
    for backend in backends {
        let alive = is_backend_alive(backend.url()).await;
        backend.set_alive(alive);
        let status = if alive { "up" } else { "down" };
        tracing::info!("{} [{}]", backend.url(), status);
    }
}

/// True if a TCP connection to the URL's host and port succeeds in time.
pub async fn is_backend_alive(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        tracing::warn!(backend = %url, "Site unreachable, error: no host");
        return false;
    };
    let Some(port) = url.port_or_known_default() else {
        tracing::warn!(backend = %url, "Site unreachable, error: no port");
        return false;
    };
    // IPv6 hosts come back bracketed from the URL.
    let host = host.trim_start_matches('[').trim_end_matches(']');

    match time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => true,
        Ok(Err(e)) => {
            tracing::warn!(backend = %url, error = %e, "Site unreachable");
            false
        }
        Err(_) => {
            tracing::warn!(backend = %url, "Site unreachable, error: timeout");
            false
        }
    }
}
