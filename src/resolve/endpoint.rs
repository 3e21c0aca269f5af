//! Endpoint resolution.
//!
//! Turns a parsed URL into an `EndpointDescriptor`: the network is chosen from
//! the selector (or the default network), the host is canonicalized either as
//! a literal address or through the name service, and the gateway comes from
//! the network table.

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use super::url::WttpUrl;
use crate::config::{NetworkConfig, NetworkTable, NAME_SERVICE_SUFFIX};
use crate::error_handling::UrlError;
use crate::protocol::{Address, NameResolver};

/// Fully resolved connection parameters for one URL.
///
/// Created once per resolved URL and never modified.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    /// Checksummed host address.
    pub canonical_host: Address,
    pub network: Arc<NetworkConfig>,
    pub gateway_address: Address,
    /// Request path, never empty.
    pub path: String,
    /// The URL exactly as the caller wrote it.
    pub original_url: WttpUrl,
    /// The same URL with the canonical host and network name.
    pub canonical_url: WttpUrl,
}

impl EndpointDescriptor {
    /// Whether `other` targets the same host on the same network.
    pub fn same_origin(&self, other: &EndpointDescriptor) -> bool {
        self.canonical_host == other.canonical_host && self.network.name == other.network.name
    }

    /// Descriptor for another URL whose host and network resolve the same way.
    pub fn for_url(&self, url: &WttpUrl) -> EndpointDescriptor {
        EndpointDescriptor {
            path: url.path().to_string(),
            original_url: url.clone(),
            canonical_url: canonical_url(url, self.canonical_host, &self.network),
            ..self.clone()
        }
    }
}

fn canonical_url(url: &WttpUrl, host: Address, network: &NetworkConfig) -> WttpUrl {
    url.with_authority(
        &host.to_checksum(),
        url.network().map(|_| network.name.as_str()),
    )
}

/// Returns true when the host must be resolved through the name service.
pub fn is_name_service_host(host: &str) -> bool {
    host.to_ascii_lowercase().ends_with(NAME_SERVICE_SUFFIX)
}

/// Picks the network for a URL's selector.
pub fn select_network(
    networks: &NetworkTable,
    selector: Option<&str>,
) -> Result<Arc<NetworkConfig>, UrlError> {
    match selector {
        Some(selector) => networks
            .lookup(selector)
            .cloned()
            .ok_or_else(|| UrlError::UnknownNetwork(selector.to_string())),
        None => Ok(networks.default_network().clone()),
    }
}

/// Resolves the host segment to its canonical address.
///
/// Name-service hosts are delegated to `names`; without one they fail as a
/// name-resolution error.
pub async fn resolve_host(
    host: &str,
    network: &NetworkConfig,
    names: Option<&dyn NameResolver>,
) -> Result<Address, UrlError> {
    if is_name_service_host(host) {
        let resolver = names.ok_or_else(|| UrlError::NameResolution {
            name: host.to_string(),
            source: "no name resolver configured".into(),
        })?;
        let address = resolver
            .resolve(host, network)
            .await
            .map_err(|source| UrlError::NameResolution {
                name: host.to_string(),
                source,
            })?;
        debug!("Resolved {} on {} to {}", host, network.name, address);
        return Ok(address);
    }

    Address::parse(host).map_err(|source| UrlError::InvalidHost {
        host: host.to_string(),
        source,
    })
}

/// Identity of the resource a URL names, independent of how it is spelled.
///
/// Literal hosts are checksummed, name-service hosts lowercased, and the
/// selector replaced by the name of the network it selects (the default
/// network when absent). The fragment is dropped.
pub fn resource_key(url: &WttpUrl, networks: &NetworkTable) -> String {
    let host = url.host();
    let host = if is_name_service_host(host) {
        host.to_ascii_lowercase()
    } else {
        Address::parse(host)
            .map(|address| address.to_checksum())
            .unwrap_or_else(|_| host.to_ascii_lowercase())
    };
    let network = match select_network(networks, url.network()) {
        Ok(network) => network.name.clone(),
        Err(_) => url.network().unwrap_or_default().to_ascii_lowercase(),
    };
    url.with_authority(&host, Some(&network)).without_fragment()
}

/// Resolves a parsed URL into an endpoint descriptor.
pub async fn resolve_endpoint(
    url: &WttpUrl,
    networks: &NetworkTable,
    names: Option<&dyn NameResolver>,
) -> Result<EndpointDescriptor, UrlError> {
    let network = select_network(networks, url.network())?;
    let canonical_host = resolve_host(url.host(), &network, names).await?;
    Ok(EndpointDescriptor {
        canonical_host,
        gateway_address: network.gateway_address,
        path: url.path().to_string(),
        original_url: url.clone(),
        canonical_url: canonical_url(url, canonical_host, &network),
        network,
    })
}

/// Parses and resolves a raw URL string.
pub async fn resolve(
    raw_url: &str,
    networks: &NetworkTable,
    names: Option<&dyn NameResolver>,
) -> Result<EndpointDescriptor, UrlError> {
    let url = WttpUrl::parse(raw_url)?;
    resolve_endpoint(&url, networks, names).await
}
