//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server, identified by its URL
//! - Track liveness (alive/dead), shared between prober and request tasks
//! - Carry the forwarding capability used to deliver requests to it

use axum::body::Body;
use axum::http::Response;
use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::{Position, Url};

use crate::http::forward::TransportError;
use crate::http::request::ProxyRequest;

/// Delivers a request to one upstream.
///
/// `Ok` means the upstream answered, whatever the status code. `Err` means
/// the request never got a response and no response has been written.
pub trait Forward: Send + Sync {
    fn forward(&self, request: ProxyRequest) -> BoxFuture<'_, Result<Response<Body>, TransportError>>;
}

/// A single backend server.
pub struct Backend {
    url: Url,
    alive: AtomicBool,
    forwarder: Arc<dyn Forward>,
}

impl Backend {
    /// Create a new backend. Backends start out alive.
    pub fn new(url: Url, forwarder: Arc<dyn Forward>) -> Self {
        Self {
            url,
            alive: AtomicBool::new(true),
            forwarder,
        }
    }

    /// The backend's URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Host and port, as used in log lines.
    pub fn address(&self) -> &str {
        &self.url[Position::BeforeHost..Position::AfterPort]
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Hand the request to this backend's forwarding capability.
    pub async fn forward(&self, request: ProxyRequest) -> Result<Response<Body>, TransportError> {
        self.forwarder.forward(request).await
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("url", &self.url.as_str())
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}
