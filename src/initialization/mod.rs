//! Application initialization.
//!
//! This module provides logger setup shared by the CLI and by embedding
//! applications that want the same log format.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
