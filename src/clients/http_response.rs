//! HTTP response types for the Onfido API client.
//!
//! [`HttpResponse`] is an immutable envelope: status, case-insensitive
//! multi-valued headers, and the raw body bytes. Interpretation of the body
//! lives in [`rest`](crate::rest).

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::clients::retry::parse_retry_after;

/// A response from the Onfido API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// The status line text (e.g. `404 Not Found`).
    pub status: String,
    /// Response headers keyed by lowercase name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a new response, normalizing header names to lowercase.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }

        let status = reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map_or_else(|| code.to_string(), |reason| format!("{code} {reason}"));

        Self {
            code,
            status,
            headers: normalized,
            body,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns `true` for a `302 Found` redirect.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.code == 302
    }

    /// Returns the first value of the named header (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_values(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns all values of the named header (case-insensitive).
    #[must_use]
    pub fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Returns the `Retry-After` header as a whole number of seconds.
    ///
    /// See [`parse_retry_after`] for the accepted format.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after").and_then(parse_retry_after)
    }

    /// Returns the `Location` header, used by download redirects.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location").filter(|value| !value.is_empty())
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (k, v) in pairs {
            map.entry((*k).to_string()).or_default().push((*v).to_string());
        }
        map
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), Vec::new());
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_outside_2xx() {
        for code in [199, 302, 404, 422, 429, 500] {
            assert!(!HttpResponse::new(code, HashMap::new(), Vec::new()).is_ok());
        }
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = HttpResponse::new(200, headers(&[("X-Total-Count", "6")]), Vec::new());
        assert_eq!(response.header("x-total-count"), Some("6"));
        assert_eq!(response.header("X-TOTAL-COUNT"), Some("6"));
    }

    #[test]
    fn test_multi_valued_headers_are_merged() {
        let response = HttpResponse::new(
            200,
            headers(&[("Link", "<a>; rel=\"next\""), ("link", "<b>; rel=\"last\"")]),
            Vec::new(),
        );
        assert_eq!(response.header_values("link").unwrap().len(), 2);
    }

    #[test]
    fn test_retry_after_parsing() {
        let response = HttpResponse::new(429, headers(&[("Retry-After", "3")]), Vec::new());
        assert_eq!(response.retry_after(), Some(Duration::from_secs(3)));

        let response = HttpResponse::new(429, headers(&[("Retry-After", "soon")]), Vec::new());
        assert_eq!(response.retry_after(), None);
    }

    #[test]
    fn test_status_text() {
        let response = HttpResponse::new(404, HashMap::new(), Vec::new());
        assert_eq!(response.status, "404 Not Found");
    }

    #[test]
    fn test_location_ignores_empty_value() {
        let response = HttpResponse::new(302, headers(&[("Location", "")]), Vec::new());
        assert!(response.location().is_none());
        assert!(response.is_found());
    }

    #[test]
    fn test_json_decoding() {
        let response = HttpResponse::new(200, HashMap::new(), br#"{"id":"abc"}"#.to_vec());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], "abc");
    }
}
