//! Fetch pipeline.
//!
//! This module provides:
//! - Request mapping from caller headers to protocol requests
//! - Endpoint validation probes
//! - Response synthesis from protocol result blocks
//! - The redirect state machine and its per-call context
//! - `WttpClient`, which drives a fetch end to end

mod client;
mod context;
mod redirects;
mod request;
pub mod response;
mod validation;

// Re-export public API
pub use client::WttpClient;
pub use context::{HopRequest, RedirectContext};
pub use redirects::{
    is_redirect_status, normalize_status, redirect_method, resolve_redirect, RedirectAction,
    RedirectPolicy,
};
pub use request::{build_request, parse_if_modified_since, parse_range, RequestInit};
pub use response::{synthesize, synthesize_headers, Response};
pub use validation::{probe_request, validate_endpoint};
