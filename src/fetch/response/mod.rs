//! Response synthesis.
//!
//! This module turns protocol HEAD/GET results into HTTP-shaped responses.

mod synthesizer;
mod types;

pub use synthesizer::{cache_control, http_date, synthesize, synthesize_headers};
pub use types::Response;
