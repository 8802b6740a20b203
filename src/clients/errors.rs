//! HTTP-specific error types for the Onfido API client.
//!
//! - [`InvalidHttpRequestError`]: a request descriptor failed validation before sending
//! - [`HttpError`]: unified transport error (network failure after retries,
//!   invalid request or URL, cancellation)
//!
//! Non-2xx responses are not transport errors: they come back as an
//! [`HttpResponse`](crate::clients::HttpResponse) and are classified by
//! [`rest::classify`](crate::rest::classify).
//!
//! # Example
//!
//! ```rust,ignore
//! use onfido::clients::HttpError;
//!
//! match client.request(&ctx, request).await {
//!     Ok(response) => println!("status {}", response.code),
//!     Err(HttpError::Network { attempts, source }) => {
//!         println!("gave up after {attempts} attempts: {source}");
//!     }
//!     Err(HttpError::Cancelled | HttpError::DeadlineExceeded) => println!("stopped"),
//!     Err(e) => println!("other: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request descriptor fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path must be absolute.
    #[error("Invalid request path '{path}'. Paths must start with '/'.")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// GET and DELETE requests cannot carry a body.
    #[error("Cannot send a body with {method}.")]
    BodyNotAllowed {
        /// The HTTP method that was used.
        method: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}'.")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// The body could not be serialized.
    #[error("Failed to serialize request body: {reason}")]
    Serialize {
        /// The serializer's error message.
        reason: String,
    },
}

/// Unified error type for transport-level failures.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Every attempt failed without a usable response.
    #[error("request failed after {attempts} attempt(s): {source}")]
    Network {
        /// Number of attempts made, including the first send.
        attempts: u32,
        /// The last underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request URL could not be built; nothing was sent.
    #[error("invalid request URL '{url}': {source}")]
    InvalidUrl {
        /// The URL that was rejected.
        url: String,
        /// The HTTP client's error.
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The caller's context was cancelled.
    #[error("context cancelled")]
    Cancelled,

    /// The caller's context deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

impl HttpError {
    /// Returns `true` for cancellation and deadline errors.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}
