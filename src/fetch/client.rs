//! The fetch orchestrator.
//!
//! Drives one fetch as an explicit loop over redirect hops:
//! resolve, validate, build the request, HEAD, synthesize, decide, and
//! finally GET when the terminal response is a successful GET.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};

use super::context::{HopRequest, RedirectContext};
use super::redirects::{normalize_status, resolve_redirect, RedirectAction};
use super::request::{build_request, RequestInit};
use super::response::{synthesize, Response};
use super::validation::validate_endpoint;
use crate::config::ClientConfig;
use crate::error_handling::{CancelReason, FetchError, RequestError};
use crate::protocol::{
    CallTarget, ChainAdapter, Method, NameResolver, ProtocolRequest, Route, Signer,
};
use crate::resolve::{resolve_endpoint, EndpointDescriptor, WttpUrl};

/// Fetch client over a chain adapter.
///
/// Cheap to clone; clones share the configuration and collaborators. Every
/// call to `fetch` carries its own redirect and validation state, so one
/// client can serve any number of concurrent fetches.
#[derive(Clone)]
pub struct WttpClient {
    config: Arc<ClientConfig>,
    adapter: Arc<dyn ChainAdapter>,
    names: Option<Arc<dyn NameResolver>>,
    signer: Option<Arc<dyn Signer>>,
}

/// Resolution and validation already done during one fetch.
#[derive(Default)]
struct CallState {
    endpoints: HashMap<(String, Option<String>), EndpointDescriptor>,
    validated: Vec<EndpointDescriptor>,
}

impl WttpClient {
    pub fn new(config: ClientConfig, adapter: Arc<dyn ChainAdapter>) -> Self {
        Self {
            config: Arc::new(config),
            adapter,
            names: None,
            signer: None,
        }
    }

    /// Enables `.eth` hosts.
    pub fn with_name_resolver(mut self, names: Arc<dyn NameResolver>) -> Self {
        self.names = Some(names);
        self
    }

    /// Hands `signer` to every adapter call.
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches a `wttp://` URL.
    ///
    /// The caller's signal and deadline (or the configured timeout) bound the
    /// whole redirect chain. On cancellation nothing partial is returned.
    ///
    /// # Errors
    ///
    /// Any `FetchError`. Errors with an HTTP mapping can be turned into a
    /// response with [`Response::from_error`].
    pub async fn fetch(&self, url: &str, init: RequestInit) -> Result<Response, FetchError> {
        let signal = init.signal.clone();
        let deadline = init.timeout.or(self.config.timeout);
        let work = self.run(url, init);

        let bounded = async move {
            match deadline {
                Some(deadline) => tokio::time::timeout(deadline, work)
                    .await
                    .unwrap_or(Err(FetchError::Cancelled(CancelReason::DeadlineExceeded))),
                None => work.await,
            }
        };

        let result = match signal {
            Some(signal) => {
                tokio::select! {
                    biased;
                    _ = signal.cancelled() => Err(FetchError::Cancelled(CancelReason::Aborted)),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        };

        if let Err(e) = &result {
            warn!("Fetch of {} failed ({}): {}", url, e.error_type(), e);
        }
        result
    }

    async fn run(&self, url: &str, init: RequestInit) -> Result<Response, FetchError> {
        let method = init.parsed_method()?;
        let start = WttpUrl::parse(url)?;
        let mut ctx =
            RedirectContext::new(&start, &self.config.networks, self.config.max_redirects, method);
        let mut state = CallState::default();
        let mut hop = HopRequest {
            url: start,
            method,
            body: init.body,
        };

        loop {
            let endpoint = self.endpoint_for(&hop.url, &mut state).await?;
            let request = build_request(
                &endpoint,
                hop.method,
                &init.headers,
                &self.config.protocol_version,
            )?;
            let target = self.target(&endpoint);

            debug!("HEAD {} ({} {})", hop.url, hop.method, endpoint.canonical_url);
            let mut head = self
                .adapter
                .head_request(target, &request)
                .await
                .map_err(|source| FetchError::Transport {
                    host: target.route.host(),
                    source,
                })?;
            head.status = normalize_status(head.status);
            let response = synthesize(&head, None, &hop.url);

            match resolve_redirect(response, &head, &hop, init.redirect, &mut ctx) {
                RedirectAction::Retry(next) => hop = next,
                RedirectAction::Fail(e) => return Err(e),
                RedirectAction::Return(response) => {
                    let mut response = self.complete(response, &hop, &endpoint, &request).await?;
                    response.redirected = ctx.hops() > 0;
                    info!(
                        "{} {} -> {} {} after {} redirect(s)",
                        hop.method,
                        hop.url,
                        response.status,
                        response.status_text(),
                        ctx.hops()
                    );
                    return Ok(response);
                }
            }
        }
    }

    /// Finishes a terminal hop: issues the GET for a successful GET, and
    /// rejects write verbs that would otherwise complete.
    async fn complete(
        &self,
        response: Response,
        hop: &HopRequest,
        endpoint: &EndpointDescriptor,
        request: &ProtocolRequest,
    ) -> Result<Response, FetchError> {
        if !response.ok() {
            return Ok(response);
        }
        match hop.method {
            Method::Get => {
                debug!("GET {}", hop.url);
                let target = self.target(endpoint);
                let mut result = self
                    .adapter
                    .get_request(target, request)
                    .await
                    .map_err(|source| FetchError::Transport {
                        host: target.route.host(),
                        source,
                    })?;
                result.head.status = normalize_status(result.head.status);
                Ok(synthesize(&result.head, Some(result.data), &hop.url))
            }
            method if method.is_readable() => Ok(response),
            method => Err(RequestError::UnsupportedMethod(method).into()),
        }
    }

    /// Resolves (and on first contact validates) the endpoint for a hop.
    async fn endpoint_for(
        &self,
        url: &WttpUrl,
        state: &mut CallState,
    ) -> Result<EndpointDescriptor, FetchError> {
        let key = (
            url.host().to_ascii_lowercase(),
            url.network().map(str::to_ascii_lowercase),
        );
        let endpoint = match state.endpoints.get(&key) {
            Some(known) => known.for_url(url),
            None => {
                let endpoint =
                    resolve_endpoint(url, &self.config.networks, self.names.as_deref()).await?;
                state.endpoints.insert(key, endpoint.clone());
                endpoint
            }
        };

        let validated = state.validated.iter().any(|known| known.same_origin(&endpoint));
        if self.config.validate_endpoints && !validated {
            validate_endpoint(
                self.adapter.as_ref(),
                &endpoint,
                &self.config.protocol_version,
                self.signer.as_deref(),
            )
            .await?;
            state.validated.push(endpoint.clone());
        }
        Ok(endpoint)
    }

    fn target<'a>(&'a self, endpoint: &'a EndpointDescriptor) -> CallTarget<'a> {
        CallTarget {
            network: &endpoint.network,
            route: Route::Gateway {
                gateway: endpoint.gateway_address,
                host: endpoint.canonical_host,
            },
            signer: self.signer.as_deref(),
        }
    }
}

impl std::fmt::Debug for WttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WttpClient")
            .field("config", &self.config)
            .field("names", &self.names.is_some())
            .field("signer", &self.signer)
            .finish()
    }
}

