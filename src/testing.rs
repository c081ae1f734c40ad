//! Test doubles shared by unit tests.

use axum::body::Body;
use axum::http::{Response, StatusCode};
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::http::forward::TransportError;
use crate::http::request::ProxyRequest;
use crate::load_balancer::backend::Forward;

/// A forwarding capability with a fixed outcome that records its calls.
#[derive(Debug)]
pub struct StubForwarder {
    outcome: Option<(StatusCode, &'static str)>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ProxyRequest>>,
}

impl StubForwarder {
    /// Always answers 200 with `body`.
    pub fn ok(body: &'static str) -> Self {
        Self::status(StatusCode::OK, body)
    }

    /// Always answers with `status` and `body`.
    pub fn status(status: StatusCode, body: &'static str) -> Self {
        Self {
            outcome: Some((status, body)),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Always fails with a transport error.
    pub fn failing() -> Self {
        Self {
            outcome: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ProxyRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Forward for StubForwarder {
    fn forward(&self, request: ProxyRequest) -> BoxFuture<'_, Result<Response<Body>, TransportError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        let result = match self.outcome {
            Some((status, body)) => {
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = status;
                Ok(response)
            }
            None => Err(TransportError::Timeout(Duration::ZERO)),
        };
        Box::pin(async move { result })
    }
}
