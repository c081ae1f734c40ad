//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --backends / --port / --health-check-interval (or LB_* env vars)
//!     → loader.rs (parse flags, parse backend URLs)
//!     → validation.rs (semantic checks)
//!     → LbConfig (validated, immutable)
//!     → consumed once by HttpServer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the backend list is never resized
//! - Every configuration error is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{CliArgs, ConfigError};
pub use schema::LbConfig;
pub use validation::ValidationError;
