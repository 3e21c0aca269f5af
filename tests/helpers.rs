// Shared test helpers: a scripted in-memory chain adapter, a name resolver
// backed by a map, and a two-network table.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test file uses a different subset

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use wttp_fetch::config::VALIDATION_PROBE_PATH;
use wttp_fetch::protocol::{Bytes32, CacheControl, ProtocolRequest, RedirectInfo, ResourceMetadata};
use wttp_fetch::{
    Address, BoxError, CallTarget, ChainAdapter, ClientConfig, GetResult, HeadResult, NameResolver,
    NetworkConfig, NetworkTable, Route, WttpClient,
};

pub const HOST_A: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const HOST_B: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const GATEWAY_SEPOLIA: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";
pub const GATEWAY_POLYGON: &str = "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb";

pub fn addr(text: &str) -> Address {
    Address::parse(text).expect("test address must be valid")
}

/// `sepolia` (default, alias `sep`) and `polygon` (alias `pol`).
pub fn networks() -> NetworkTable {
    NetworkTable::new(vec![
        NetworkConfig {
            name: "sepolia".to_string(),
            chain_id: 11155111,
            rpc_endpoints: vec!["https://rpc.sepolia.example".to_string()],
            gateway_address: addr(GATEWAY_SEPOLIA),
            aliases: vec!["sep".to_string()],
        },
        NetworkConfig {
            name: "polygon".to_string(),
            chain_id: 137,
            rpc_endpoints: vec!["https://rpc.polygon.example".to_string()],
            gateway_address: addr(GATEWAY_POLYGON),
            aliases: vec!["pol".to_string()],
        },
    ])
    .expect("test network table must be valid")
}

pub fn client(adapter: Arc<MockChainAdapter>) -> WttpClient {
    WttpClient::new(ClientConfig::new(networks()), adapter)
}

pub fn client_with(adapter: Arc<MockChainAdapter>, config: ClientConfig) -> WttpClient {
    WttpClient::new(config, adapter)
}

/// Which adapter operation was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Head,
    Get,
}

/// One adapter call as observed by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub network: String,
    pub route: Route,
    pub request: ProtocolRequest,
    pub signed: bool,
}

impl RecordedCall {
    pub fn is_probe(&self) -> bool {
        self.request.path == VALIDATION_PROBE_PATH
    }
}

#[derive(Debug, Clone)]
struct Resource {
    head: HeadResult,
    body: Vec<u8>,
}

/// Scripted chain adapter keyed by host address and path.
///
/// Probes (path `404`) answer 404 unless the host or gateway was marked broken.
/// Unknown paths answer 404. A resource whose etag matches `If-None-Match`
/// answers 304.
#[derive(Default)]
pub struct MockChainAdapter {
    resources: HashMap<(Address, String), Resource>,
    non_conforming_hosts: HashSet<Address>,
    broken_gateways: HashSet<Address>,
    failing_hosts: HashSet<Address>,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChainAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource(mut self, host: &str, path: &str, head: HeadResult, body: &[u8]) -> Self {
        self.resources.insert(
            (addr(host), path.to_string()),
            Resource {
                head,
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn with_redirect(self, host: &str, path: &str, status: u16, location: &str) -> Self {
        self.with_resource(host, path, redirect(status, location), b"")
    }

    /// Host answers its probe with 200 instead of 404.
    pub fn with_non_conforming_host(mut self, host: &str) -> Self {
        self.non_conforming_hosts.insert(addr(host));
        self
    }

    /// Every call routed through this gateway fails.
    pub fn with_broken_gateway(mut self, gateway: &str) -> Self {
        self.broken_gateways.insert(addr(gateway));
        self
    }

    /// Every non-probe call for this host fails.
    pub fn with_failing_host(mut self, host: &str) -> Self {
        self.failing_hosts.insert(addr(host));
        self
    }

    /// Sleeps before answering every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Non-probe calls only.
    pub fn requests(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| !c.is_probe()).collect()
    }

    pub fn probes(&self) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.is_probe()).collect()
    }

    fn record(&self, kind: CallKind, target: &CallTarget<'_>, request: &ProtocolRequest) {
        self.calls.lock().unwrap().push(RecordedCall {
            kind,
            network: target.network.name.clone(),
            route: target.route,
            request: request.clone(),
            signed: target.signer.is_some(),
        });
    }

    async fn answer(
        &self,
        target: &CallTarget<'_>,
        request: &ProtocolRequest,
    ) -> Result<(HeadResult, Vec<u8>), BoxError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Route::Gateway { gateway, .. } = target.route {
            if self.broken_gateways.contains(&gateway) {
                return Err("gateway call reverted".into());
            }
        }

        let host = target.route.host();
        if request.path == VALIDATION_PROBE_PATH {
            let status = match target.route {
                Route::Host(host) if self.non_conforming_hosts.contains(&host) => 200,
                _ => 404,
            };
            return Ok((status_only(status), Vec::new()));
        }
        if self.failing_hosts.contains(&host) {
            return Err("execution reverted".into());
        }

        match self.resources.get(&(host, request.path.clone())) {
            Some(resource) => {
                let mut head = resource.head.clone();
                if !request.if_none_match.is_zero() && request.if_none_match == head.etag {
                    head.status = 304;
                }
                Ok((head, resource.body.clone()))
            }
            None => Ok((status_only(404), Vec::new())),
        }
    }
}

#[async_trait]
impl ChainAdapter for MockChainAdapter {
    async fn head_request(
        &self,
        target: CallTarget<'_>,
        request: &ProtocolRequest,
    ) -> Result<HeadResult, BoxError> {
        self.record(CallKind::Head, &target, request);
        self.answer(&target, request).await.map(|(head, _)| head)
    }

    async fn get_request(
        &self,
        target: CallTarget<'_>,
        request: &ProtocolRequest,
    ) -> Result<GetResult, BoxError> {
        self.record(CallKind::Get, &target, request);
        self.answer(&target, request)
            .await
            .map(|(head, data)| GetResult { head, data })
    }
}

/// Name resolver backed by a fixed map.
#[derive(Default)]
pub struct MapNames(pub HashMap<String, Address>);

impl MapNames {
    pub fn with(mut self, name: &str, address: &str) -> Self {
        self.0.insert(name.to_string(), addr(address));
        self
    }
}

#[async_trait]
impl NameResolver for MapNames {
    async fn resolve(&self, name: &str, _network: &NetworkConfig) -> Result<Address, BoxError> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| format!("{name} has no resolver record").into())
    }
}

pub fn status_only(status: u16) -> HeadResult {
    HeadResult {
        status,
        ..Default::default()
    }
}

pub fn redirect(status: u16, location: &str) -> HeadResult {
    HeadResult {
        status,
        redirect: RedirectInfo {
            code: status,
            location: location.to_string(),
        },
        ..Default::default()
    }
}

/// A 200 `text/html; charset=utf-8` resource, cacheable for an hour.
pub fn html_page(size: u64) -> HeadResult {
    HeadResult {
        status: 200,
        methods: 0b0000_0011,
        cache: CacheControl {
            max_age: 3600,
            public: true,
            ..Default::default()
        },
        metadata: ResourceMetadata {
            mime_type: Bytes32::from_text("text/html"),
            charset: Bytes32::from_text("utf-8"),
            size,
            ..Default::default()
        },
        ..Default::default()
    }
}
