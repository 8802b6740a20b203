//! HTTP request types for the Onfido API client.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder. A
//! descriptor is built fresh for each call and never reused; its body is
//! serialized once, at build time, into an immutable byte buffer.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::multipart::MultipartForm;

/// HTTP methods supported by the Onfido API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources and actions.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` if requests with this method may carry a body.
    #[must_use]
    pub const fn allows_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// An encoded request body and its content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestBody {
    /// Value of the `Content-Type` header.
    pub content_type: String,
    /// The serialized bytes, sent unchanged on every attempt.
    pub bytes: Vec<u8>,
}

impl RequestBody {
    /// Serializes `payload` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError::Serialize`] if serialization fails.
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, InvalidHttpRequestError> {
        let bytes =
            serde_json::to_vec(payload).map_err(|e| InvalidHttpRequestError::Serialize {
                reason: e.to_string(),
            })?;
        Ok(Self {
            content_type: "application/json".to_string(),
            bytes,
        })
    }

    /// Encodes `pairs` as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = pairs
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k.as_ref()),
                    urlencoding::encode(v.as_ref())
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        Self {
            content_type: "application/x-www-form-urlencoded".to_string(),
            bytes: encoded.into_bytes(),
        }
    }

    /// Encodes a multipart form.
    #[must_use]
    pub fn multipart(form: &MultipartForm) -> Self {
        let (content_type, bytes) = form.encode();
        Self {
            content_type,
            bytes,
        }
    }
}

/// A fully specified plan for one HTTP request.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use onfido::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Post, "/applicants")
///     .json(&json!({"first_name": "Jane", "last_name": "Doe"}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.body.unwrap().content_type, "application/json");
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path, relative to the client endpoint (e.g. `/applicants`).
    pub path: String,
    /// The encoded body, if any.
    pub body: Option<RequestBody>,
    /// Query parameters; repeated keys are allowed.
    pub query: Vec<(String, String)>,
    /// Per-request headers. These win over client defaults.
    pub extra_headers: HashMap<String, Vec<String>>,
    /// Retry budget override; `None` uses the client default.
    pub retries: Option<u32>,
    /// Retry wait override; `None` uses the client default.
    pub retry_wait: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `path` does not start with `/`
    /// - a body is attached to a GET or DELETE request
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if !self.path.starts_with('/') {
            return Err(InvalidHttpRequestError::InvalidPath {
                path: self.path.clone(),
            });
        }

        if self.body.is_some() && !self.http_method.allows_body() {
            return Err(InvalidHttpRequestError::BodyNotAllowed {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<Result<RequestBody, InvalidHttpRequestError>>,
    query: Vec<(String, String)>,
    extra_headers: HashMap<String, Vec<String>>,
    retries: Option<u32>,
    retry_wait: Option<Duration>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            extra_headers: HashMap::new(),
            retries: None,
            retry_wait: None,
        }
    }

    /// Sets a JSON body serialized from `payload`.
    ///
    /// Serialization happens immediately; failures surface from [`build`](Self::build).
    #[must_use]
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> Self {
        self.body = Some(RequestBody::json(payload));
        self
    }

    /// Sets a URL-encoded form body.
    #[must_use]
    pub fn form<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.body = Some(Ok(RequestBody::form(pairs)));
        self
    }

    /// Sets a multipart form body.
    #[must_use]
    pub fn multipart(mut self, form: &MultipartForm) -> Self {
        self.body = Some(Ok(RequestBody::multipart(form)));
        self
    }

    /// Sets a pre-encoded body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(Ok(body));
        self
    }

    /// Appends query parameters.
    #[must_use]
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Appends a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a header value. Repeated calls with the same name add values.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Overrides the client's retry budget and wait for this request.
    #[must_use]
    pub const fn retries(mut self, retries: u32, wait: Duration) -> Self {
        self.retries = Some(retries);
        self.retry_wait = Some(wait);
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the body failed to serialize or
    /// the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let body = self.body.transpose()?;
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body,
            query: self.query,
            extra_headers: self.extra_headers,
            retries: self.retries,
            retry_wait: self.retry_wait,
        };
        request.verify()?;
        Ok(request)
    }
}
