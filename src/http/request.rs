//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for each inbound request
//! - Capture the inbound request in a replayable form
//! - Prepare the request for forwarding to a backend
//!
//! # Design Decisions
//! - The body is buffered once so every retry and attempt can resend it
//! - Hop-by-hop headers never reach the upstream

use axum::body::{Body, Bytes};
use axum::extract::ConnectInfo;
use axum::http::header::{HeaderName, HeaderValue, CONNECTION};
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, Request, Uri};
use std::net::SocketAddr;
use tower_http::request_id::{MakeRequestId, RequestId};
use url::{Position, Url};
use uuid::Uuid;

use crate::http::forward::TransportError;

/// Request ID header.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Retry count header set on re-dispatched requests.
pub static X_RETRY_COUNT: HeaderName = HeaderName::from_static("x-retry-count");

static X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Headers that describe a single connection rather than the message.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// An inbound request, buffered so it can be forwarded more than once.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub client_addr: Option<SocketAddr>,
}

impl ProxyRequest {
    /// Capture request parts and an already buffered body.
    pub fn new(parts: Parts, body: Bytes) -> Self {
        let client_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            client_addr,
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Record how many times this request has been retried.
    pub fn set_retry_count(&mut self, retry: u32) {
        self.headers.insert(X_RETRY_COUNT.clone(), HeaderValue::from(retry));
    }

    pub fn clear_retry_count(&mut self) {
        self.headers.remove(&X_RETRY_COUNT);
    }

    /// Build the request sent to `target`.
    pub fn into_upstream(self, target: &Url) -> Result<Request<Body>, TransportError> {
        let uri = upstream_uri(target, &self.uri)?;

        let mut headers = self.headers;
        remove_hop_by_hop_headers(&mut headers);
        if let Some(addr) = self.client_addr {
            append_forwarded_for(&mut headers, addr);
        }

        let mut request = Request::new(Body::from(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = uri;
        *request.headers_mut() = headers;
        Ok(request)
    }

    #[cfg(test)]
    pub(crate) fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            uri: path.parse().unwrap(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            client_addr: None,
        }
    }
}

/// Resolve the upstream URI: backend origin, joined path, merged query.
fn upstream_uri(target: &Url, inbound: &Uri) -> Result<Uri, TransportError> {
    let path = join_paths(target.path(), inbound.path());
    let query = match (
        target.query().filter(|q| !q.is_empty()),
        inbound.query().filter(|q| !q.is_empty()),
    ) {
        (Some(base), Some(extra)) => Some(format!("{base}&{extra}")),
        (Some(q), None) | (None, Some(q)) => Some(q.to_string()),
        (None, None) => None,
    };

    let authority = &target[Position::BeforeHost..Position::AfterPort];
    let mut uri = format!("{}://{}{}", target.scheme(), authority, path);
    if let Some(query) = query {
        uri.push('?');
        uri.push_str(&query);
    }

    uri.parse()
        .map_err(|e: axum::http::uri::InvalidUri| TransportError::InvalidTarget(format!("{uri}: {e}")))
}

/// Join two paths with exactly one slash between them.
fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, addr: SocketAddr) {
    let ip = addr.ip().to_string();
    let value = match headers.get(&X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(prior) if !prior.is_empty() => format!("{prior}, {ip}"),
        _ => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR.clone(), value);
    }
}

/// Strip hop-by-hop headers, including any named by `Connection`.
pub(crate) fn remove_hop_by_hop_headers(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}
