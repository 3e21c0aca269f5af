//! Endpoint validation.
//!
//! Before the first request to a host, both the host contract and the gateway
//! are probed with a HEAD for a relative path (`404`, no leading `/`). A
//! conforming implementation rejects it with 404; anything else, including a
//! transport failure, means the contract does not speak the protocol.

use log::{debug, warn};

use super::redirects::normalize_status;
use crate::config::{VALIDATION_EXPECTED_STATUS, VALIDATION_PROBE_PATH};
use crate::error_handling::FetchError;
use crate::protocol::{
    ByteRange, CallTarget, ChainAdapter, ContentTag, Method, ProtocolRequest, Route, Signer,
};
use crate::resolve::EndpointDescriptor;

enum ProbeOutcome {
    Conforming,
    Status(u16),
    Failed(crate::protocol::BoxError),
}

/// The HEAD request used for both probes.
pub fn probe_request(protocol_version: &str) -> ProtocolRequest {
    ProtocolRequest {
        protocol_version: protocol_version.to_string(),
        path: VALIDATION_PROBE_PATH.to_string(),
        method: Method::Head,
        if_modified_since: 0,
        if_none_match: ContentTag::ZERO,
        range: ByteRange::WHOLE,
    }
}

/// Probes the host, then the gateway, stopping at the first failure.
///
/// # Errors
///
/// `FetchError::InvalidHost` (501) when the host probe fails and
/// `FetchError::InvalidGateway` (502) when the gateway probe fails.
pub async fn validate_endpoint(
    adapter: &dyn ChainAdapter,
    endpoint: &EndpointDescriptor,
    protocol_version: &str,
    signer: Option<&dyn Signer>,
) -> Result<(), FetchError> {
    let request = probe_request(protocol_version);
    let host = endpoint.canonical_host;
    let gateway = endpoint.gateway_address;

    let host_target = CallTarget {
        network: &endpoint.network,
        route: Route::Host(host),
        signer,
    };
    match probe(adapter, host_target, &request).await {
        ProbeOutcome::Conforming => {}
        ProbeOutcome::Status(status) => {
            warn!("Host {} answered probe with {}", host, status);
            return Err(FetchError::InvalidHost {
                host,
                status: Some(status),
                source: None,
            });
        }
        ProbeOutcome::Failed(source) => {
            warn!("Host {} probe failed: {}", host, source);
            return Err(FetchError::InvalidHost {
                host,
                status: None,
                source: Some(source),
            });
        }
    }

    let gateway_target = CallTarget {
        network: &endpoint.network,
        route: Route::Gateway { gateway, host },
        signer,
    };
    match probe(adapter, gateway_target, &request).await {
        ProbeOutcome::Conforming => {}
        ProbeOutcome::Status(status) => {
            warn!("Gateway {} answered probe with {}", gateway, status);
            return Err(FetchError::InvalidGateway {
                gateway,
                status: Some(status),
                source: None,
            });
        }
        ProbeOutcome::Failed(source) => {
            warn!("Gateway {} probe failed: {}", gateway, source);
            return Err(FetchError::InvalidGateway {
                gateway,
                status: None,
                source: Some(source),
            });
        }
    }

    debug!(
        "Validated host {} and gateway {} on {}",
        host, gateway, endpoint.network.name
    );
    Ok(())
}

async fn probe(
    adapter: &dyn ChainAdapter,
    target: CallTarget<'_>,
    request: &ProtocolRequest,
) -> ProbeOutcome {
    match adapter.head_request(target, request).await {
        Ok(head) => match normalize_status(head.status) {
            VALIDATION_EXPECTED_STATUS => ProbeOutcome::Conforming,
            status => ProbeOutcome::Status(status),
        },
        Err(e) => ProbeOutcome::Failed(e),
    }
}
