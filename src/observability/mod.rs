//! Observability subsystem.
//!
//! # Design Decisions
//! - `tracing` events with structured fields, filtered through `RUST_LOG`
//! - HTTP request spans come from tower-http's `TraceLayer`

pub mod logging;
