//! wttp_fetch library: fetch-style access to `wttp://` resources
//!
//! This library resolves `wttp://host[:network]/path` URLs to on-chain hosts,
//! validates that host and gateway speak the protocol, maps HTTP request
//! semantics (conditional requests, ranges, redirects) onto protocol calls and
//! synthesizes ordinary HTTP responses from the compact results.
//!
//! The chain itself is reached through a [`ChainAdapter`] supplied by the
//! caller; this crate performs no network I/O of its own.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wttp_fetch::{ChainAdapter, ClientConfig, NetworkTable, RequestInit, WttpClient};
//!
//! # async fn example(adapter: Arc<dyn ChainAdapter>) -> Result<(), Box<dyn std::error::Error>> {
//! let networks = NetworkTable::from_path("networks.json")?;
//! let client = WttpClient::new(ClientConfig::new(networks), adapter);
//!
//! let response = client
//!     .fetch("wttp://0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed:sepolia/index.html", RequestInit::new())
//!     .await?;
//! println!("{} {}", response.status, response.status_text());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! `fetch` uses Tokio timers for deadlines, so it must run inside a Tokio
//! runtime.

pub mod config;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod protocol;
pub mod resolve;

// Re-export public API
pub use config::{ClientConfig, LogFormat, LogLevel, NetworkConfig, NetworkTable};
pub use error_handling::{
    CancelReason, ConfigError, ErrorType, FetchError, InitializationError, RequestError, UrlError,
};
pub use fetch::{RedirectPolicy, RequestInit, Response, WttpClient};
pub use protocol::{
    Address, AddressError, BoxError, CallTarget, ChainAdapter, GetResult, HeadResult, Method,
    NameResolver, ProtocolRequest, Route, Signer,
};
pub use resolve::{resolve, EndpointDescriptor, WttpUrl};
