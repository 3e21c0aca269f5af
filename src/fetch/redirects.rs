//! Redirect resolution.
//!
//! Given the synthesized response for one hop, decides whether the fetch
//! returns, follows a redirect, or fails. The decision rules are applied in a
//! fixed order; see `resolve_redirect`.

use log::{debug, warn};

use super::context::{HopRequest, RedirectContext};
use super::response::Response;
use crate::config::{
    DEFAULT_INDEX_RESOURCE, HTTP_STATUS_INTERNAL_SERVER_ERROR, HTTP_STATUS_NOT_MODIFIED,
};
use crate::error_handling::FetchError;
use crate::protocol::{HeadResult, Method};

/// How the caller wants redirects handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectPolicy {
    /// Follow redirects up to the hop limit.
    #[default]
    Follow,
    /// Return redirect responses as-is.
    Manual,
    /// Fail on any redirect.
    Error,
}

/// What the orchestrator does after a hop.
#[derive(Debug)]
pub enum RedirectAction {
    Return(Response),
    Retry(HopRequest),
    Fail(FetchError),
}

/// Status 0 means the adapter reported nothing usable; treat it as 500.
pub fn normalize_status(status: u16) -> u16 {
    if status == 0 {
        HTTP_STATUS_INTERNAL_SERVER_ERROR
    } else {
        status
    }
}

/// Whether `status` is a redirect for policy purposes. 304 is a conditional
/// hit, not a redirect.
pub fn is_redirect_status(status: u16) -> bool {
    (300..400).contains(&status) && status != HTTP_STATUS_NOT_MODIFIED
}

/// Method and body for the next hop after a redirect with `status`.
///
/// 307/308 keep both. 303 always becomes a bodiless GET. 301/302 become a
/// bodiless GET unless the method was already GET or HEAD.
pub fn redirect_method(
    status: u16,
    method: Method,
    body: Option<Vec<u8>>,
) -> (Method, Option<Vec<u8>>) {
    match status {
        307 | 308 => (method, body),
        303 => (Method::Get, None),
        301 | 302 if matches!(method, Method::Get | Method::Head) => (method, body),
        301 | 302 => (Method::Get, None),
        _ => (method, body),
    }
}

/// Decides the next step for a hop.
///
/// `response` is the synthesized response for `hop` and `head` the protocol
/// block it came from.
pub fn resolve_redirect(
    mut response: Response,
    head: &HeadResult,
    hop: &HopRequest,
    policy: RedirectPolicy,
    ctx: &mut RedirectContext<'_>,
) -> RedirectAction {
    let mut status = normalize_status(response.status);
    response.status = status;
    let mut location = head.redirect.location.trim().to_string();

    if status == 300 && policy == RedirectPolicy::Follow {
        if location.is_empty() {
            location = DEFAULT_INDEX_RESOURCE.to_string();
        }
        warn!(
            "No content negotiation for 300 at {}; treating as 302 to '{}'",
            hop.url, location
        );
        status = 302;
    }

    // 304 is a 3xx status but skips the policy branch; it is a conditional hit
    if is_redirect_status(status) {
        match policy {
            RedirectPolicy::Error => {
                return RedirectAction::Fail(FetchError::RedirectPolicy { status, location });
            }
            RedirectPolicy::Manual => return RedirectAction::Return(response),
            RedirectPolicy::Follow => {}
        }
    }

    if status == HTTP_STATUS_NOT_MODIFIED {
        response.body = None;
        return RedirectAction::Return(response);
    }

    if !is_redirect_status(status) {
        return RedirectAction::Return(response);
    }

    if location.is_empty() {
        warn!("Redirect status {} for {} but no location", status, hop.url);
        return RedirectAction::Return(response);
    }

    let target = match hop.url.join(&location) {
        Ok(target) => target,
        Err(e) => return RedirectAction::Fail(e.into()),
    };
    let (method, body) = redirect_method(status, hop.method, hop.body.clone());
    if let Err(e) = ctx.record_hop(&target) {
        return RedirectAction::Fail(e);
    }

    debug!(
        "Redirect {} {} -> {} {} (hop {}, {} left, started as {})",
        status,
        hop.url,
        method,
        target,
        ctx.hops(),
        ctx.remaining(),
        ctx.original_method()
    );
    RedirectAction::Retry(HopRequest {
        url: target,
        method,
        body,
    })
}
