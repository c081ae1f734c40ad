//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Build pool → Bind listener → Serve + probe
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → server and health monitor exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
