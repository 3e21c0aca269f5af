//! Address and network resolution.
//!
//! This module provides:
//! - `wttp://` URL parsing and relative reference resolution
//! - Network selection from URL selectors
//! - Host canonicalization (literal addresses and name-service names)

mod endpoint;
mod url;

// Re-export public API
pub use self::url::WttpUrl;
pub use endpoint::{
    is_name_service_host, resolve, resolve_endpoint, resolve_host, resource_key,
    select_network, EndpointDescriptor,
};
