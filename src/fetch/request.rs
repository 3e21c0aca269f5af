//! Request descriptions and mapping to the protocol request.
//!
//! `RequestInit` is the caller-facing description of a fetch (method,
//! headers, body, redirect policy, cancellation). `build_request` maps it to
//! the protocol's native request for one hop.

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use http::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE};
use http::{HeaderMap, HeaderName, HeaderValue};
use regex::Regex;
use tokio_util::sync::CancellationToken;

use super::redirects::RedirectPolicy;
use crate::error_handling::RequestError;
use crate::protocol::{ByteRange, ContentTag, Method, ProtocolRequest};
use crate::resolve::EndpointDescriptor;

static RANGE_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d*)\s*-\s*(\d*)$").expect("range pattern is a valid regex")
});

/// Caller-supplied description of a fetch.
#[derive(Debug, Clone)]
pub struct RequestInit {
    /// Method name, matched case-insensitively (default `GET`).
    pub method: String,
    /// Request headers. `If-Modified-Since`, `If-None-Match` and `Range` are
    /// mapped to protocol fields; `Accept*` are carried for future content
    /// negotiation.
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub redirect: RedirectPolicy,
    /// Cancels the whole fetch, every redirect hop included.
    pub signal: Option<CancellationToken>,
    /// Deadline for the whole fetch; falls back to the client's timeout.
    pub timeout: Option<Duration>,
}

impl Default for RequestInit {
    fn default() -> Self {
        Self {
            method: Method::Get.to_string(),
            headers: HeaderMap::new(),
            body: None,
            redirect: RedirectPolicy::default(),
            signal: None,
            timeout: None,
        }
    }
}

impl RequestInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_redirect(mut self, policy: RedirectPolicy) -> Self {
        self.redirect = policy;
        self
    }

    pub fn with_signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parses the method name against the protocol's method table.
    pub fn parsed_method(&self) -> Result<Method, RequestError> {
        Method::from_str(self.method.trim())
            .map_err(|_| RequestError::UnknownMethod(self.method.clone()))
    }
}

/// Builds the protocol request for one hop.
pub fn build_request(
    endpoint: &EndpointDescriptor,
    method: Method,
    headers: &HeaderMap,
    protocol_version: &str,
) -> Result<ProtocolRequest, RequestError> {
    let if_modified_since = header_str(headers, &IF_MODIFIED_SINCE)
        .map(parse_if_modified_since)
        .unwrap_or(0);
    let if_none_match = header_str(headers, &IF_NONE_MATCH)
        .map(ContentTag::from_if_none_match)
        .unwrap_or(ContentTag::ZERO);
    let range = match header_str(headers, &RANGE) {
        Some(value) => parse_range(value)?,
        None => ByteRange::WHOLE,
    };

    Ok(ProtocolRequest {
        protocol_version: protocol_version.to_string(),
        path: endpoint.path.clone(),
        method,
        if_modified_since,
        if_none_match,
        range,
    })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Maps an `If-Modified-Since` value to epoch seconds.
///
/// Accepts HTTP dates and bare epoch seconds; anything else (or a date before
/// the epoch) is 0, meaning unconditional.
pub fn parse_if_modified_since(value: &str) -> u64 {
    let value = value.trim();
    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        return u64::try_from(date.timestamp()).unwrap_or(0);
    }
    value.parse::<u64>().unwrap_or(0)
}

/// Maps a `Range` value to protocol bounds.
///
/// `bytes=S-E` gives `(S, E)`, `bytes=S-` gives `(S, 0)` and `bytes=-N` gives
/// `(-N, 0)`. Unparsable or unsatisfiable values fall back to the whole
/// resource; only multi-range lists are rejected.
pub fn parse_range(value: &str) -> Result<ByteRange, RequestError> {
    let value = value.trim();
    let spec = match value.split_once('=') {
        Some((unit, spec)) if unit.trim().eq_ignore_ascii_case("bytes") => spec.trim(),
        Some(_) => return Ok(ByteRange::WHOLE),
        None => value,
    };

    if spec.contains(',') {
        return Err(RequestError::MultipleRanges(value.to_string()));
    }

    let Some(captures) = RANGE_SPEC.captures(spec) else {
        return Ok(ByteRange::WHOLE);
    };
    let start = &captures[1];
    let end = &captures[2];

    let range = match (start.is_empty(), end.is_empty()) {
        (true, true) => ByteRange::WHOLE,
        (true, false) => match end.parse::<i64>() {
            Ok(suffix) => ByteRange {
                start: -suffix,
                end: 0,
            },
            Err(_) => ByteRange::WHOLE,
        },
        (false, true) => match start.parse::<i64>() {
            Ok(start) => ByteRange { start, end: 0 },
            Err(_) => ByteRange::WHOLE,
        },
        (false, false) => match (start.parse::<i64>(), end.parse::<i64>()) {
            (Ok(start), Ok(end)) if start <= end => ByteRange { start, end },
            _ => ByteRange::WHOLE,
        },
    };
    Ok(range)
}
