//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active health checks (active.rs):
//!     Periodic timer
//!     → TCP connect to each backend (2s timeout)
//!     → Backend::set_alive(result)
//!
//! Passive failure detection lives in the request handler:
//!     Transport failure past the retry ceiling
//!     → ServerPool::mark_backend_status(addr, false)
//! ```
//!
//! # Design Decisions
//! - Binary alive/dead, no thresholds or hysteresis
//! - Probes are transport level only, no HTTP request is sent
//! - A dead backend comes back only through a successful probe

pub mod active;

pub use active::HealthMonitor;
