//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay backend responses to the client
//! - Build the load balancer's own failure responses
//!
//! # Design Decisions
//! - Streaming responses avoid buffering the upstream body
//! - Hop-by-hop headers stripped on the way back
//! - Every availability failure maps to 503 Service Unavailable

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use hyper::body::Incoming;

use crate::http::request::remove_hop_by_hop_headers;

/// Wrap an upstream response for relaying to the client.
pub fn from_upstream(response: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    remove_hop_by_hop_headers(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

/// The response sent when no backend could serve the request.
pub fn service_unavailable() -> Response<Body> {
    (StatusCode::SERVICE_UNAVAILABLE, "Service not available").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_unavailable_is_503() {
        let response = service_unavailable();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Service not available");
    }
}
