//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the backend pool and proxy handler from configuration
//! - Create the Axum Router sending every path and method to the proxy
//! - Wire up middleware (request ID, tracing, body limit)
//! - Run the health monitor next to the server until shutdown

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::request::Parts,
    response::Response,
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::LbConfig;
use crate::health::HealthMonitor;
use crate::http::forward::{build_client, HttpForwarder};
use crate::http::handler::ProxyHandler;
use crate::http::request::{MakeRequestUuidV4, ProxyRequest, X_REQUEST_ID};
use crate::load_balancer::{Backend, ServerPool};

/// Largest request body buffered for forwarding.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ProxyHandler>,
}

/// HTTP server for the load balancer.
pub struct HttpServer {
    router: Router,
    config: LbConfig,
    pool: Arc<ServerPool>,
}

impl HttpServer {
    /// Create a server forwarding to every configured backend.
    pub fn new(config: LbConfig) -> Self {
        let client = build_client();
        let mut pool = ServerPool::new();

        for url in &config.backends {
            let forwarder = HttpForwarder::new(url.clone(), client.clone());
            pool.add_backend(Arc::new(Backend::new(url.clone(), Arc::new(forwarder))));
            tracing::info!(backend = %url, "Configured server");
        }

        Self::with_pool(config, Arc::new(pool))
    }

    /// Create a server around an already populated pool.
    pub fn with_pool(config: LbConfig, pool: Arc<ServerPool>) -> Self {
        let state = AppState {
            handler: Arc::new(ProxyHandler::new(pool.clone())),
        };
        let router = Self::build_router(state);
        Self {
            router,
            config,
            pool,
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone())),
            )
    }

    /// The router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The shared backend pool.
    pub fn pool(&self) -> Arc<ServerPool> {
        self.pool.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;

        let monitor = HealthMonitor::new(self.pool.clone(), self.config.health_check_interval());
        let monitor_handle = tokio::spawn(monitor.run(shutdown.resubscribe()));

        tracing::info!(address = %addr, "Load Balancer started on port {}", addr.port());

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await;

        // Without a graceful stop the monitor never sees the signal.
        if served.is_err() {
            monitor_handle.abort();
        }
        match monitor_handle.await {
            Err(e) if !e.is_cancelled() => tracing::error!(error = %e, "Health monitor task failed"),
            _ => {}
        }

        served?;
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler: buffer the request and hand it to the dispatcher.
async fn proxy_handler(State(state): State<AppState>, parts: Parts, body: Bytes) -> Response {
    let request = ProxyRequest::new(parts, body);

    tracing::debug!(
        method = %request.method,
        path = %request.path(),
        "Proxying request"
    );

    state.handler.handle(request).await
}
