//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Transport failure reported by a backend
//!     → retries.rs (retry below the ceiling, else fail over)
//!     → handler re-dispatches with the new EscalationContext
//! ```
//!
//! # Design Decisions
//! - Fixed ceilings and a fixed 10ms pause, no exponential backoff
//! - Counters are per request, never global

pub mod retries;

pub use retries::{Escalation, EscalationContext};
