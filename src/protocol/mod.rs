//! WTTP protocol model.
//!
//! This module provides:
//! - Contract addresses with checksummed canonical form
//! - Method codes and the `Allow` bitmask table
//! - Wire structures for requests and HEAD/GET results
//! - Collaborator traits (chain adapter, name resolver, signer)

mod adapter;
mod address;
mod method;
mod types;

// Re-export public API
pub use adapter::{BoxError, CallTarget, ChainAdapter, NameResolver, Route, Signer};
pub use address::{Address, AddressError};
pub use method::{allowed_methods, Method, ALLOW_TABLE};
pub use types::{
    ByteRange, Bytes32, CacheControl, ContentTag, FixedString, GetResult, HeadResult,
    ProtocolRequest, RedirectInfo, ResourceMetadata,
};
