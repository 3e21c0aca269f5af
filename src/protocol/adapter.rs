//! Collaborator seams: the chain transport, the name service and the signer.
//!
//! The client never talks to a network itself. A `ChainAdapter` executes
//! HEAD/GET calls against a host or gateway contract, a `NameResolver` turns
//! `.eth` names into addresses, and a `Signer` is carried through untouched.

use std::fmt;

use async_trait::async_trait;

use super::address::Address;
use super::types::{GetResult, HeadResult, ProtocolRequest};
use crate::config::NetworkConfig;

/// Boxed error returned by collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which contract a call is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Call the content host contract directly.
    Host(Address),
    /// Call the gateway, which forwards to `host`.
    Gateway { gateway: Address, host: Address },
}

impl Route {
    /// The content host this route ultimately serves.
    pub fn host(&self) -> Address {
        match self {
            Route::Host(host) => *host,
            Route::Gateway { host, .. } => *host,
        }
    }
}

/// Opaque credential handle.
///
/// Read operations never inspect it; it is handed to the adapter unchanged.
pub trait Signer: Send + Sync + fmt::Debug {}

/// Everything an adapter needs to place one call.
#[derive(Debug, Clone, Copy)]
pub struct CallTarget<'a> {
    pub network: &'a NetworkConfig,
    pub route: Route,
    pub signer: Option<&'a dyn Signer>,
}

/// Executes protocol calls against a resolved host or gateway.
///
/// Errors are transport failures, not protocol statuses; a protocol-level
/// "not found" comes back as `Ok` with status 404.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    async fn head_request(
        &self,
        target: CallTarget<'_>,
        request: &ProtocolRequest,
    ) -> Result<HeadResult, BoxError>;

    async fn get_request(
        &self,
        target: CallTarget<'_>,
        request: &ProtocolRequest,
    ) -> Result<GetResult, BoxError>;
}

/// Resolves name-service names to addresses.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve(&self, name: &str, network: &NetworkConfig) -> Result<Address, BoxError>;
}
