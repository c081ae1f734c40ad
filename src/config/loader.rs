//! Configuration loading from command-line flags and the environment.

use clap::Parser;
use thiserror::Error;
use url::Url;

use crate::config::schema::{LbConfig, DEFAULT_HEALTH_CHECK_INTERVAL_SECS, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid backend address '{address}': {source}")]
    InvalidBackend {
        address: String,
        #[source]
        source: url::ParseError,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line interface of the load balancer.
#[derive(Debug, Parser)]
#[command(name = "lb-proxy")]
#[command(about = "Round-robin HTTP load balancer", long_about = None)]
pub struct CliArgs {
    /// Load balanced backends, use commas to separate
    #[arg(long, env = "LB_BACKENDS", default_value = "")]
    pub backends: String,

    /// Port to serve
    #[arg(long, env = "LB_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Health check interval in seconds
    #[arg(long, env = "LB_HEALTH_CHECK_INTERVAL", default_value_t = DEFAULT_HEALTH_CHECK_INTERVAL_SECS)]
    pub health_check_interval: u64,
}

impl CliArgs {
    /// Turn parsed arguments into a validated configuration.
    pub fn into_config(self) -> Result<LbConfig, ConfigError> {
        let config = LbConfig {
            backends: parse_backend_list(&self.backends)?,
            port: self.port,
            health_check_interval_secs: self.health_check_interval,
        };
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Parse a comma separated backend list, keeping its order.
pub fn parse_backend_list(list: &str) -> Result<Vec<Url>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Url::parse(token).map_err(|source| ConfigError::InvalidBackend {
                address: token.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("lb-proxy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parses_flags_into_config() {
        let config = parse(&[
            "--backends",
            "http://localhost:8081,http://localhost:8082",
            "--port",
            "9000",
            "--health-check-interval",
            "5",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.health_check_interval_secs, 5);
        let ports: Vec<_> = config.backends.iter().map(|b| b.port()).collect();
        assert_eq!(ports, vec![Some(8081), Some(8082)]);
    }

    #[test]
    fn test_defaults_apply_when_flags_are_absent() {
        let args = parse(&["--backends", "http://localhost:8081"]);
        assert_eq!(args.port, 3030);
        assert_eq!(args.health_check_interval, 20);
    }

    #[test]
    fn test_missing_backends_is_fatal() {
        let err = parse(&[]).into_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors == &[ValidationError::NoBackends]));
    }

    #[test]
    fn test_malformed_backend_is_fatal() {
        let err = parse_backend_list("http://localhost:8081,::not-a-url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBackend { ref address, .. } if address == "::not-a-url"));
    }

    #[test]
    fn test_blank_tokens_are_skipped() {
        let backends = parse_backend_list(" http://a:1 , ,http://b:2,").unwrap();
        assert_eq!(backends.len(), 2);
        assert_eq!(backends[0].host_str(), Some("a"));
        assert_eq!(backends[1].host_str(), Some("b"));
    }
}
