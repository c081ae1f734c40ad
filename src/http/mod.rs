//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, body limit)
//!     → request.rs (buffer into a replayable ProxyRequest)
//!     → handler.rs (pick a live backend, retry / fail over)
//!     → forward.rs (deliver to the backend over HTTP)
//!     → response.rs (relay upstream response, or 503)
//!     → Send to client
//! ```

pub mod forward;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{HttpForwarder, TransportError};
pub use handler::ProxyHandler;
pub use request::{ProxyRequest, X_REQUEST_ID, X_RETRY_COUNT};
pub use server::HttpServer;
