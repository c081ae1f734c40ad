//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives at the handler
//!     → pool.rs (advance cursor, scan for the next live backend)
//!     → backend.rs (forward through the backend's capability)
//!     → on repeated transport failure: pool.rs marks the backend dead
//! ```
//!
//! # Design Decisions
//! - Pure round robin; dead backends are skipped, never removed
//! - One atomic flag per backend, no pool-wide lock
//! - The cursor is a single atomic counter

pub mod backend;
pub mod pool;

pub use backend::{Backend, Forward};
pub use pool::ServerPool;
