//! Error handling.
//!
//! This module provides the closed error taxonomy of the client:
//! - **URL errors**: bad scheme, host or network selector
//! - **Request errors**: methods and headers that cannot be mapped
//! - **Fetch errors**: everything a top-level fetch can fail with, each with
//!   an optional HTTP status hint
//! - **Configuration and initialization errors**

mod types;

// Re-export public API
pub use types::{
    CancelReason, ConfigError, ErrorType, FetchError, InitializationError, RequestError, UrlError,
};
