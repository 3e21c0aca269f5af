//! `wttp://` URL parsing and relative reference resolution.
//!
//! The authority of a WTTP URL is `host[:network]`, where the network
//! selector may be a name like `sepolia` or a chain id larger than a port
//! number. Neither fits a standard port, so the authority is split by hand
//! and only the path, query and fragment go through `url::Url`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use url::Url;

use crate::config::WTTP_SCHEME;
use crate::error_handling::UrlError;

/// Placeholder authority used when handing path resolution to `url::Url`.
const BASE_AUTHORITY: &str = "base.invalid";

/// Maximum URL length, matching common browser and server limits.
const MAX_URL_LENGTH: usize = 2048;

static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://").expect("scheme pattern is a valid regex")
});

/// A parsed `wttp://host[:network]/path[?query][#fragment]` URL.
///
/// The host and network selector are kept exactly as the caller spelled
/// them; canonicalization happens in the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WttpUrl {
    host: String,
    network: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl WttpUrl {
    /// Parses an absolute `wttp://` URL.
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let raw = raw.trim();
        if raw.len() > MAX_URL_LENGTH {
            return Err(UrlError::Malformed {
                url: raw.chars().take(50).collect(),
                reason: format!("exceeds maximum length ({} > {MAX_URL_LENGTH})", raw.len()),
            });
        }

        let captures = SCHEME_PREFIX
            .captures(raw)
            .ok_or_else(|| UrlError::Malformed {
                url: raw.to_string(),
                reason: "missing scheme".to_string(),
            })?;
        let scheme = &captures[1];
        if !scheme.eq_ignore_ascii_case(WTTP_SCHEME) {
            return Err(UrlError::InvalidScheme {
                scheme: scheme.to_string(),
                url: raw.to_string(),
            });
        }

        let rest = &raw[captures[0].len()..];
        let authority_end = rest
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(rest.len());
        let (authority, remainder) = rest.split_at(authority_end);

        // Userinfo carries no meaning for contract hosts
        let authority = authority
            .rsplit_once('@')
            .map(|(_, host)| host)
            .unwrap_or(authority);

        let (host, network) = match authority.rsplit_once(':') {
            Some((host, selector)) => {
                let selector = selector.trim();
                (host, (!selector.is_empty()).then(|| selector.to_string()))
            }
            None => (authority, None),
        };
        if host.trim().is_empty() {
            return Err(UrlError::EmptyHost(raw.to_string()));
        }

        let base = Url::parse(&format!("{WTTP_SCHEME}://{BASE_AUTHORITY}{remainder}")).map_err(
            |e| UrlError::Malformed {
                url: raw.to_string(),
                reason: e.to_string(),
            },
        )?;

        Ok(Self::from_parts(host.trim().to_string(), network, &base))
    }

    fn from_parts(host: String, network: Option<String>, parsed: &Url) -> Self {
        let path = match parsed.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        Self {
            host,
            network,
            path,
            query: parsed.query().map(str::to_string),
            fragment: parsed.fragment().map(str::to_string),
        }
    }

    /// Resolves a redirect target against this URL.
    ///
    /// Absolute `scheme://` targets are parsed as-is, `//host/...` keeps the
    /// scheme, and anything else is resolved as a relative reference on this
    /// URL's host and network.
    pub fn join(&self, reference: &str) -> Result<Self, UrlError> {
        let reference = reference.trim();
        if SCHEME_PREFIX.is_match(reference) {
            return Self::parse(reference);
        }
        if reference.starts_with("//") {
            return Self::parse(&format!("{WTTP_SCHEME}:{reference}"));
        }

        let base = Url::parse(&format!(
            "{WTTP_SCHEME}://{BASE_AUTHORITY}{}",
            self.path_query_fragment()
        ))
        .map_err(|e| UrlError::Malformed {
            url: self.to_string(),
            reason: e.to_string(),
        })?;
        let joined = base.join(reference).map_err(|e| UrlError::Malformed {
            url: reference.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self::from_parts(
            self.host.clone(),
            self.network.clone(),
            &joined,
        ))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The network selector as written, if any.
    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    /// Path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Same URL with a different host and network selector.
    pub fn with_authority(&self, host: &str, network: Option<&str>) -> Self {
        Self {
            host: host.to_string(),
            network: network.map(str::to_string),
            ..self.clone()
        }
    }

    /// String form without the fragment, used to compare redirect targets.
    pub fn without_fragment(&self) -> String {
        let mut out = self.authority_prefix();
        out.push_str(&self.path);
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        out
    }

    fn authority_prefix(&self) -> String {
        match &self.network {
            Some(network) => format!("{WTTP_SCHEME}://{}:{network}", self.host),
            None => format!("{WTTP_SCHEME}://{}", self.host),
        }
    }

    fn path_query_fragment(&self) -> String {
        let mut out = self.path.clone();
        if let Some(query) = &self.query {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

impl fmt::Display for WttpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.authority_prefix(), self.path_query_fragment())
    }
}

impl std::str::FromStr for WttpUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for WttpUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
