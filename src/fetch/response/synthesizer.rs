//! Header synthesis from protocol result blocks.
//!
//! This module provides:
//! - Content negotiation headers rebuilt from fixed-width metadata fields
//! - Cache-Control assembly from numeric and boolean cache directives
//! - `Allow` decoding from the method bitmask
//! - Location resolution against the URL of the hop being answered

use http::header::{
    HeaderName, ALLOW, CACHE_CONTROL, CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_LENGTH,
    CONTENT_TYPE, ETAG, LAST_MODIFIED, LOCATION,
};
use http::{HeaderMap, HeaderValue};
use log::debug;

use super::types::Response;
use crate::config::HTTP_STATUS_NOT_MODIFIED;
use crate::fetch::redirects::normalize_status;
use crate::protocol::{allowed_methods, CacheControl, HeadResult};
use crate::resolve::WttpUrl;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Builds a response from a HEAD block and an optional GET payload.
///
/// The status is normalized and a 304 never carries a body.
pub fn synthesize(head: &HeadResult, body: Option<Vec<u8>>, request_url: &WttpUrl) -> Response {
    let status = normalize_status(head.status);
    let body = if status == HTTP_STATUS_NOT_MODIFIED {
        None
    } else {
        body
    };
    Response {
        status,
        headers: synthesize_headers(head, request_url),
        body,
        url: request_url.to_string(),
        redirected: false,
    }
}

/// Maps the metadata, cache, method and redirect fields of a HEAD block to
/// standard headers. Fields holding their "unset" value produce no header.
pub fn synthesize_headers(head: &HeadResult, request_url: &WttpUrl) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let metadata = &head.metadata;

    let mime = metadata.mime_type.trimmed();
    if !mime.is_empty() {
        let charset = metadata.charset.trimmed();
        let content_type = if charset.is_empty() {
            mime
        } else {
            format!("{mime}; charset={charset}")
        };
        insert(&mut headers, CONTENT_TYPE, content_type);
    }
    if !metadata.encoding.is_blank() {
        insert(&mut headers, CONTENT_ENCODING, metadata.encoding.trimmed());
    }
    if !metadata.language.is_blank() {
        insert(&mut headers, CONTENT_LANGUAGE, metadata.language.trimmed());
    }
    if !head.etag.is_zero() {
        insert(&mut headers, ETAG, head.etag.to_string());
    }
    if let Some(date) = http_date(metadata.last_modified) {
        insert(&mut headers, LAST_MODIFIED, date);
    }
    if metadata.size > 0 {
        insert(&mut headers, CONTENT_LENGTH, metadata.size.to_string());
    }
    if let Some(directives) = cache_control(&head.cache) {
        insert(&mut headers, CACHE_CONTROL, directives);
    }

    let allowed = allowed_methods(head.methods);
    if !allowed.is_empty() {
        let names: Vec<&str> = allowed.iter().map(|m| m.as_ref()).collect();
        insert(&mut headers, ALLOW, names.join(", "));
    }

    let location = head.redirect.location.trim();
    if !location.is_empty() {
        let absolute = request_url
            .join(location)
            .map(|url| url.to_string())
            .unwrap_or_else(|e| {
                debug!("Keeping unresolvable location '{}' as-is: {}", location, e);
                location.to_string()
            });
        insert(&mut headers, LOCATION, absolute);
    }

    headers
}

/// Joins the applicable cache directives, or `None` when none apply.
pub fn cache_control(cache: &CacheControl) -> Option<String> {
    let mut directives = Vec::new();
    if cache.max_age > 0 {
        directives.push(format!("max-age={}", cache.max_age));
    }
    if cache.s_max_age > 0 {
        directives.push(format!("s-maxage={}", cache.s_max_age));
    }
    for (set, name) in [
        (cache.no_store, "no-store"),
        (cache.no_cache, "no-cache"),
        (cache.immutable, "immutable"),
        (cache.public, "public"),
        (cache.must_revalidate, "must-revalidate"),
    ] {
        if set {
            directives.push(name.to_string());
        }
    }
    if cache.stale_while_revalidate > 0 {
        directives.push(format!(
            "stale-while-revalidate={}",
            cache.stale_while_revalidate
        ));
    }
    if cache.stale_if_error > 0 {
        directives.push(format!("stale-if-error={}", cache.stale_if_error));
    }

    (!directives.is_empty()).then(|| directives.join(", "))
}

/// Formats epoch seconds as an HTTP-date; 0 and out-of-range values give `None`.
pub fn http_date(epoch_seconds: u64) -> Option<String> {
    if epoch_seconds == 0 {
        return None;
    }
    let seconds = i64::try_from(epoch_seconds).ok()?;
    chrono::DateTime::from_timestamp(seconds, 0).map(|date| date.format(HTTP_DATE_FORMAT).to_string())
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: String) {
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => debug!("Dropping {} header with unencodable value {:?}", name, value),
    }
}
