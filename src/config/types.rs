//! Configuration types.
//!
//! This module defines the client configuration and the logging options
//! shared by the library and the CLI.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{DEFAULT_FETCH_TIMEOUT, MAX_REDIRECT_HOPS, PROTOCOL_VERSION};
use crate::config::networks::NetworkTable;
use crate::error_handling::ConfigError;

/// Upper bound accepted for `max_redirects`.
const MAX_REDIRECTS_LIMIT: usize = 100;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Client configuration.
///
/// Built once and shared read-only (behind an `Arc`) by every fetch issued
/// through a client.
///
/// # Examples
///
/// ```no_run
/// use wttp_fetch::{ClientConfig, NetworkTable};
///
/// let networks = NetworkTable::from_path("networks.json")?;
/// let config = ClientConfig {
///     max_redirects: 5,
///     ..ClientConfig::new(networks)
/// };
/// config.validate()?;
/// # Ok::<(), wttp_fetch::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Networks the resolver may select from
    pub networks: NetworkTable,

    /// Maximum redirect hops followed by one fetch
    pub max_redirects: usize,

    /// Deadline for a whole fetch, redirects included (`None` disables it)
    pub timeout: Option<Duration>,

    /// Protocol version sent with every request
    pub protocol_version: String,

    /// Probe host and gateway before the first request to each host
    pub validate_endpoints: bool,
}

impl ClientConfig {
    pub fn new(networks: NetworkTable) -> Self {
        Self {
            networks,
            max_redirects: MAX_REDIRECT_HOPS,
            timeout: Some(DEFAULT_FETCH_TIMEOUT),
            protocol_version: PROTOCOL_VERSION.to_string(),
            validate_endpoints: true,
        }
    }

    /// Checks field values, reporting the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_redirects > MAX_REDIRECTS_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_redirects".to_string(),
                message: format!(
                    "must be at most {MAX_REDIRECTS_LIMIT}, got {}",
                    self.max_redirects
                ),
            });
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid {
                field: "timeout".to_string(),
                message: "must be greater than 0 (use None to disable)".to_string(),
            });
        }
        if self.protocol_version.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "protocol_version".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
