//! Response data structures.

use http::{HeaderMap, StatusCode};

use crate::error_handling::FetchError;

/// An HTTP-shaped response synthesized from protocol results.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    /// `None` for HEAD, OPTIONS, 304 and anything answered without a GET.
    pub body: Option<Vec<u8>>,
    /// URL of the hop that produced this response, as the caller spelled it.
    pub url: String,
    /// Whether at least one redirect was followed to get here.
    pub redirected: bool,
}

impl Response {
    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Canonical reason phrase, empty for unregistered codes.
    pub fn status_text(&self) -> &'static str {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("")
    }

    /// Header value as text, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Turns an error with an HTTP mapping (501, 502, 500, 508) into a bodiless
    /// response. Other errors return `None` and must be surfaced as errors.
    pub fn from_error(error: &FetchError, url: &str) -> Option<Response> {
        error.status_code().map(|status| Response {
            status,
            headers: HeaderMap::new(),
            body: None,
            url: url.to_string(),
            redirected: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::CancelReason;
    use crate::protocol::Address;

    fn response(status: u16, body: Option<&str>) -> Response {
        Response {
            status,
            headers: HeaderMap::new(),
            body: body.map(|b| b.as_bytes().to_vec()),
            url: "wttp://0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed/".to_string(),
            redirected: false,
        }
    }

    #[test]
    fn test_ok_range() {
        assert!(response(200, None).ok());
        assert!(response(206, None).ok());
        assert!(!response(304, None).ok());
        assert!(!response(404, None).ok());
    }

    #[test]
    fn test_status_text() {
        assert_eq!(response(200, None).status_text(), "OK");
        assert_eq!(response(508, None).status_text(), "Loop Detected");
        assert_eq!(response(599, None).status_text(), "");
    }

    #[test]
    fn test_text_decodes_body() {
        assert_eq!(response(200, Some("hello")).text().as_deref(), Some("hello"));
        assert_eq!(response(200, None).text(), None);
    }

    #[test]
    fn test_from_error_maps_status() {
        let err = FetchError::InvalidGateway {
            gateway: Address::from_bytes([9; 20]),
            status: Some(200),
            source: None,
        };
        let response = Response::from_error(&err, "wttp://x/").unwrap();
        assert_eq!(response.status, 502);
        assert!(response.body.is_none());

        assert!(Response::from_error(&FetchError::Cancelled(CancelReason::Aborted), "wttp://x/")
            .is_none());
    }
}
