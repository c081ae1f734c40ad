//! Forwarding requests to upstream backends over HTTP.
//!
//! # Responsibilities
//! - Deliver a buffered request to one backend
//! - Tell "the upstream answered" apart from "the upstream was unreachable"
//!
//! # Design Decisions
//! - One pooled client shared by every backend
//! - Upstream status codes are never failures here, only transport errors are

use axum::body::Body;
use axum::http::Response;
use futures_util::future::BoxFuture;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use thiserror::Error;
use tokio::time;
use url::Url;

use crate::http::request::ProxyRequest;
use crate::http::response;
use crate::load_balancer::backend::Forward;

/// Timeout for establishing a connection to a backend.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for a backend to start responding.
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(30);

/// A request could not be delivered to the backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, or broken mid-exchange.
    #[error("upstream unreachable: {0}")]
    Unreachable(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("invalid upstream target: {0}")]
    InvalidTarget(String),
}

/// HTTP client shared by all forwarders.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the shared upstream client.
pub fn build_client() -> HttpClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(Some(CONNECT_TIMEOUT));
    Client::builder(TokioExecutor::new()).build(connector)
}

/// Forwards requests to a single backend URL.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    target: Url,
    client: HttpClient,
    timeout: Duration,
}

impl HttpForwarder {
    pub fn new(target: Url, client: HttpClient) -> Self {
        Self {
            target,
            client,
            timeout: FORWARD_TIMEOUT,
        }
    }

    /// Override the forward deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Forward for HttpForwarder {
    fn forward(&self, request: ProxyRequest) -> BoxFuture<'_, Result<Response<Body>, TransportError>> {
        Box::pin(async move {
            let upstream = request.into_upstream(&self.target)?;
            let response = time::timeout(self.timeout, self.client.request(upstream))
                .await
                .map_err(|_| TransportError::Timeout(self.timeout))??;
            Ok(response::from_upstream(response))
        })
    }
}
