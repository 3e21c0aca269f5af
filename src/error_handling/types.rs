//! Error type definitions.
//!
//! This module defines every error the client can surface, from URL parsing
//! through endpoint validation to redirect handling.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::{
    HTTP_STATUS_BAD_GATEWAY, HTTP_STATUS_INTERNAL_SERVER_ERROR, HTTP_STATUS_LOOP_DETECTED,
    HTTP_STATUS_NOT_IMPLEMENTED,
};
use crate::protocol::{Address, AddressError, BoxError, Method};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors raised while loading or checking configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The network table has no entries.
    #[error("network table is empty; at least one network must be configured")]
    NoNetworks,

    /// Two networks claim the same alias.
    #[error("network alias '{alias}' is used by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    /// A field holds an unusable value.
    #[error("invalid {field}: {message}")]
    Invalid { field: String, message: String },

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the expected shape.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while turning a `wttp://` URL into an endpoint.
#[derive(Error, Debug)]
pub enum UrlError {
    /// The URL could not be split into its components.
    #[error("malformed URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    /// The scheme is not `wttp`.
    #[error("unsupported scheme '{scheme}' (only wttp:// is allowed): {url}")]
    InvalidScheme { scheme: String, url: String },

    /// The host segment is empty.
    #[error("URL has no host component: {0}")]
    EmptyHost(String),

    /// The host is neither a valid address nor a name-service name.
    #[error("invalid host '{host}': {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: AddressError,
    },

    /// The network selector matches no configured network.
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    /// The name service could not resolve the host.
    #[error("failed to resolve name '{name}': {source}")]
    NameResolution {
        name: String,
        #[source]
        source: BoxError,
    },
}

/// Errors raised while building the protocol request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The method string is not a protocol method.
    #[error("unknown request method '{0}'")]
    UnknownMethod(String),

    /// The method would change remote state, which this client does not do.
    #[error("method {0} is not supported by this client (read-only)")]
    UnsupportedMethod(Method),

    /// The `Range` header lists more than one range.
    #[error("multiple byte ranges are not supported: {0}")]
    MultipleRanges(String),
}

/// Why a fetch was cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    Aborted,
    /// The deadline for the whole redirect chain passed.
    DeadlineExceeded,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Aborted => f.write_str("aborted by caller"),
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
        }
    }
}

/// Every way a top-level fetch can fail.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Malformed scheme, missing or invalid host, unknown network.
    #[error(transparent)]
    Url(UrlError),

    /// The name service failed to resolve the host.
    #[error("name resolution failed for '{name}': {source}")]
    NameResolution {
        name: String,
        #[source]
        source: BoxError,
    },

    /// The request description could not be mapped to the protocol.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The content host does not implement the protocol.
    #[error("host {host} does not implement WTTP{}", status_suffix(.status))]
    InvalidHost {
        host: Address,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// The gateway does not implement the protocol.
    #[error("gateway {gateway} does not implement WTTP{}", status_suffix(.status))]
    InvalidGateway {
        gateway: Address,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// The chain adapter failed outright.
    #[error("transport failure calling {host}: {source}")]
    Transport {
        host: Address,
        #[source]
        source: BoxError,
    },

    /// A redirect was met while the caller's policy is `error`.
    #[error("redirect ({status}) to '{location}' not allowed by redirect policy")]
    RedirectPolicy { status: u16, location: String },

    /// Hop limit exhausted or a redirect loop detected.
    #[error("too many redirects ({hops} followed), last target '{url}'")]
    TooManyRedirects { url: String, hops: usize },

    /// Caller abort or deadline.
    #[error("fetch cancelled: {0}")]
    Cancelled(CancelReason),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(status) => format!(" (probe returned {status})"),
        None => String::new(),
    }
}

impl From<UrlError> for FetchError {
    fn from(error: UrlError) -> Self {
        match error {
            UrlError::NameResolution { name, source } => FetchError::NameResolution { name, source },
            other => FetchError::Url(other),
        }
    }
}

impl FetchError {
    /// The HTTP status this error maps to when the caller wants an HTTP-shaped
    /// result. `None` for errors that must always surface as errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::InvalidHost { .. } => Some(HTTP_STATUS_NOT_IMPLEMENTED),
            FetchError::InvalidGateway { .. } => Some(HTTP_STATUS_BAD_GATEWAY),
            FetchError::Transport { .. } => Some(HTTP_STATUS_INTERNAL_SERVER_ERROR),
            FetchError::TooManyRedirects { .. } => Some(HTTP_STATUS_LOOP_DETECTED),
            _ => None,
        }
    }

    /// Category used for log lines.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::Url(_) => ErrorType::Url,
            FetchError::NameResolution { .. } => ErrorType::NameResolution,
            FetchError::Request(_) => ErrorType::Request,
            FetchError::InvalidHost { .. } => ErrorType::InvalidHost,
            FetchError::InvalidGateway { .. } => ErrorType::InvalidGateway,
            FetchError::Transport { .. } => ErrorType::Transport,
            FetchError::RedirectPolicy { .. } => ErrorType::RedirectPolicy,
            FetchError::TooManyRedirects { .. } => ErrorType::TooManyRedirects,
            FetchError::Cancelled(_) => ErrorType::Cancelled,
        }
    }
}

/// Categories of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    Url,
    NameResolution,
    Request,
    InvalidHost,
    InvalidGateway,
    Transport,
    RedirectPolicy,
    TooManyRedirects,
    Cancelled,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Url => "URL error",
            ErrorType::NameResolution => "Name resolution error",
            ErrorType::Request => "Request error",
            ErrorType::InvalidHost => "Invalid host (501)",
            ErrorType::InvalidGateway => "Invalid gateway (502)",
            ErrorType::Transport => "Transport error (500)",
            ErrorType::RedirectPolicy => "Redirect policy error",
            ErrorType::TooManyRedirects => "Too many redirects (508)",
            ErrorType::Cancelled => "Cancelled",
        }
    }
}
