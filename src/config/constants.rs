//! Configuration constants.
//!
//! This module defines the protocol constants and operational defaults used
//! throughout the client.

use std::time::Duration;

/// URL scheme handled by the client (`wttp://host[:network]/path`).
pub const WTTP_SCHEME: &str = "wttp";

/// Protocol version string sent with every request.
pub const PROTOCOL_VERSION: &str = "WTTP/3.0";

/// Hosts ending with this suffix are resolved through the name service.
pub const NAME_SERVICE_SUFFIX: &str = ".eth";

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Resource targeted when a 300 (Multiple Choices) response carries no location.
pub const DEFAULT_INDEX_RESOURCE: &str = "index.html";

// Endpoint validation
/// Path used to probe hosts and gateways.
///
/// Conforming implementations reject paths that do not start with `/` with a
/// 404, so any other answer means the contract does not speak the protocol.
pub const VALIDATION_PROBE_PATH: &str = "404";

/// Status a conforming endpoint returns for the validation probe.
pub const VALIDATION_EXPECTED_STATUS: u16 = 404;

// Timeouts
/// Default deadline for a whole fetch, including every redirect hop.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_NOT_MODIFIED: u16 = 304;
pub const HTTP_STATUS_INTERNAL_SERVER_ERROR: u16 = 500;
pub const HTTP_STATUS_NOT_IMPLEMENTED: u16 = 501;
pub const HTTP_STATUS_BAD_GATEWAY: u16 = 502;
pub const HTTP_STATUS_LOOP_DETECTED: u16 = 508;
