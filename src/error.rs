//! Error types for the Onfido API client.
//!
//! This module contains the configuration error type and the top-level
//! [`Error`] returned by every operation on [`OnfidoClient`](crate::OnfidoClient).
//!
//! # Error Taxonomy
//!
//! Every public operation returns either a result or exactly one [`Error`]:
//!
//! - [`Error::Validation`]: a caller-supplied argument was rejected before any request
//! - [`Error::Api`]: the API answered with a structured error body, or a body
//!   could not be decoded (type `unknown internal error`)
//! - [`Error::Http`]: the request never produced a usable response
//! - [`Error::Cancelled`]: the operation's [`Context`](crate::Context) was
//!   cancelled or its deadline passed
//!
//! # Example
//!
//! ```rust
//! use onfido::{ApiToken, ConfigError};
//!
//! let result = ApiToken::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiToken)));
//! ```

use thiserror::Error;

use crate::clients::{HttpError, InvalidHttpRequestError};
use crate::rest::OnfidoError;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API token cannot be empty.
    #[error("API token cannot be empty. Please provide a valid Onfido API token.")]
    EmptyApiToken,

    /// Region code is not one of the supported regions.
    #[error("Invalid region '{region}'. Expected one of: 'eu', 'us', 'ca'.")]
    InvalidRegion {
        /// The invalid region code that was provided.
        region: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Base URL override is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with an http or https scheme.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}

/// Error returned by client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument is invalid; no request was sent.
    #[error("validation_error: {field} is required")]
    Validation {
        /// The name of the missing or invalid argument.
        field: &'static str,
    },

    /// The API returned a structured error, or a body could not be decoded.
    #[error(transparent)]
    Api(#[from] OnfidoError),

    /// The request failed without a usable response.
    #[error(transparent)]
    Http(HttpError),

    /// The operation was cancelled or its deadline was exceeded.
    #[error("operation cancelled: {reason}")]
    Cancelled {
        /// Why the operation stopped.
        reason: &'static str,
    },
}

impl From<HttpError> for Error {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Cancelled => Self::Cancelled {
                reason: "context cancelled",
            },
            HttpError::DeadlineExceeded => Self::Cancelled {
                reason: "context deadline exceeded",
            },
            other => Self::Http(other),
        }
    }
}

impl From<InvalidHttpRequestError> for Error {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

impl Error {
    /// Returns the domain error type (e.g. `validation_error`), if any.
    ///
    /// Argument validation failures report `validation_error` as well, so
    /// callers can treat local and remote validation uniformly.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Validation { .. } => Some("validation_error"),
            Self::Api(e) => Some(e.error_type.as_str()),
            _ => None,
        }
    }

    /// Returns `true` for local or remote validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.error_type() == Some("validation_error")
    }

    /// Returns `true` when the API reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.error_type() == Some("resource_not_found")
    }

    /// Returns `true` when the operation was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
