//! Client configuration and constants.
//!
//! This module provides:
//! - Protocol constants and operational defaults
//! - The network table (selectors, gateways, RPC endpoints)
//! - Client configuration and logging options

mod constants;
mod networks;
mod types;

// Re-export all constants
pub use constants::*;
pub use networks::{NetworkConfig, NetworkTable};
pub use types::{ClientConfig, LogFormat, LogLevel};
