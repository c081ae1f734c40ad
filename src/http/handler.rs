//! Request dispatch with retry and failover.
//!
//! # State Machine
//! ```text
//! serve(request, ctx)
//!     ctx.attempt > ATTEMPT_CEILING  → 503
//!     pool has no live peer          → 503
//!     peer.forward(request)
//!         Ok(response)               → response
//!         Err(transport failure)
//!             retry < RETRY_CEILING  → sleep 10ms, serve(request, retry + 1)
//!             otherwise              → mark peer dead, serve(request, attempt + 1, retry = 0)
//! ```
//!
//! A retry re-enters `serve` and so makes a fresh pool selection; it does
//! not target the backend that just failed. Only the failover branch marks
//! a backend dead. Re-entry is sequential and stops after at most
//! `MAX_REDISPATCHES` re-dispatches.

use axum::body::Body;
use axum::http::Response;
use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::http::forward::TransportError;
use crate::http::request::ProxyRequest;
use crate::http::response::service_unavailable;
use crate::load_balancer::{Backend, ServerPool};
use crate::resilience::retries::{Escalation, EscalationContext, RETRY_BACKOFF};

/// Routes requests to pool backends and recovers from transport failures.
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    pool: Arc<ServerPool>,
}

impl ProxyHandler {
    pub fn new(pool: Arc<ServerPool>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Arc<ServerPool> {
        &self.pool
    }

    /// Serve a new logical request with fresh escalation counters.
    pub async fn handle(&self, request: ProxyRequest) -> Response<Body> {
        self.serve(request, EscalationContext::default()).await
    }

    /// Routing entry point, re-entered on every re-dispatch.
    pub fn serve(&self, request: ProxyRequest, ctx: EscalationContext) -> BoxFuture<'_, Response<Body>> {
        Box::pin(async move {
            if ctx.attempts_exhausted() {
                tracing::warn!(
                    remote_addr = ?request.client_addr,
                    path = %request.path(),
                    attempt = ctx.attempt(),
                    "Max attempts reached, terminating"
                );
                return service_unavailable();
            }

            let Some(peer) = self.pool.next_peer() else {
                tracing::warn!(path = %request.path(), "No live backend available");
                return service_unavailable();
            };

            match peer.forward(request.clone()).await {
                Ok(response) => response,
                Err(error) => self.escalate(request, ctx, &peer, error).await,
            }
        })
    }

    /// Decide between retrying and failing over after a transport failure.
    async fn escalate(
        &self,
        mut request: ProxyRequest,
        ctx: EscalationContext,
        peer: &Backend,
        error: TransportError,
    ) -> Response<Body> {
        tracing::warn!(backend = %peer.address(), error = %error, "Upstream transport failure");

        match ctx.on_transport_failure() {
            Escalation::Retry(next) => {
                tokio::time::sleep(RETRY_BACKOFF).await;
                request.set_retry_count(next.retry());
                self.serve(request, next).await
            }
            Escalation::Failover(next) => {
                self.pool.mark_backend_status(peer.url(), false);
                tracing::info!(
                    remote_addr = ?request.client_addr,
                    path = %request.path(),
                    "Attempting retry {}",
                    ctx.attempt()
                );
                request.clear_retry_count();
                self.serve(request, next).await
            }
        }
    }
}
