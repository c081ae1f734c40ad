//! Configuration validation.
//!
//! Serde and `url` handle syntax; this module checks what a parsed
//! configuration means. All problems are reported, not just the first one.

use thiserror::Error;

use crate::config::schema::LbConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please provide one or more backends to load balance")]
    NoBackends,

    #[error("backend {address} uses unsupported scheme '{scheme}' (only http is supported)")]
    UnsupportedScheme { address: String, scheme: String },

    #[error("backend {address} has no host")]
    MissingHost { address: String },

    #[error("health check interval must be at least one second")]
    ZeroHealthCheckInterval,

    #[error("port must be non-zero")]
    ZeroPort,
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &LbConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    for backend in &config.backends {
        if backend.scheme() != "http" {
            errors.push(ValidationError::UnsupportedScheme {
                address: backend.to_string(),
                scheme: backend.scheme().to_string(),
            });
        }
        if backend.host_str().map_or(true, str::is_empty) {
            errors.push(ValidationError::MissingHost {
                address: backend.to_string(),
            });
        }
    }

    if config.health_check_interval_secs == 0 {
        errors.push(ValidationError::ZeroHealthCheckInterval);
    }

    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
