//! Per-call redirect state.
//!
//! A `RedirectContext` is created for each top-level fetch and threaded
//! through every hop of that fetch only. Nothing in it is shared between
//! calls.

use std::collections::HashSet;

use crate::config::NetworkTable;
use crate::error_handling::FetchError;
use crate::protocol::Method;
use crate::resolve::{resource_key, WttpUrl};

/// One request in a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopRequest {
    pub url: WttpUrl,
    pub method: Method,
    pub body: Option<Vec<u8>>,
}

/// Loop detection and hop budget for a single fetch.
///
/// URLs are compared by `resource_key`, so re-spelling the host or the
/// network selector does not hide a loop.
#[derive(Debug)]
pub struct RedirectContext<'a> {
    networks: &'a NetworkTable,
    visited: HashSet<String>,
    remaining: usize,
    hops: usize,
    original_method: Method,
}

impl<'a> RedirectContext<'a> {
    /// Starts a context for a fetch of `start`, which counts as visited.
    pub fn new(
        start: &WttpUrl,
        networks: &'a NetworkTable,
        max_redirects: usize,
        original_method: Method,
    ) -> Self {
        let mut visited = HashSet::new();
        visited.insert(resource_key(start, networks));
        Self {
            networks,
            visited,
            remaining: max_redirects,
            hops: 0,
            original_method,
        }
    }

    /// Claims a hop to `target`.
    ///
    /// Fails when `target` was already visited in this chain or the hop budget
    /// is spent; on success the target is marked visited.
    pub fn record_hop(&mut self, target: &WttpUrl) -> Result<(), FetchError> {
        let key = resource_key(target, self.networks);
        if self.remaining == 0 || self.visited.contains(&key) {
            return Err(FetchError::TooManyRedirects {
                url: target.to_string(),
                hops: self.hops,
            });
        }
        self.remaining -= 1;
        self.hops += 1;
        self.visited.insert(key);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn has_visited(&self, url: &WttpUrl) -> bool {
        self.visited.contains(&resource_key(url, self.networks))
    }

    /// Hops still allowed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Hops taken so far.
    pub fn hops(&self) -> usize {
        self.hops
    }

    pub fn original_method(&self) -> Method {
        self.original_method
    }
}
