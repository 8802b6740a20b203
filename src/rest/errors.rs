//! Structured errors returned by the Onfido API.
//!
//! Every non-2xx response carries a body of the form
//! `{"error": {"type": ..., "message": ..., "fields": {...}}}`. The inner
//! object decodes into [`OnfidoError`]. Bodies that fail to decode, and 2xx
//! bodies that do not match the expected shape, are reported as a synthetic
//! [`OnfidoError`] of type [`UNKNOWN_INTERNAL_ERROR`], so callers match on one
//! shape regardless of where the failure came from.
//!
//! # Example
//!
//! ```rust
//! use onfido::rest::OnfidoError;
//!
//! let error = OnfidoError::new("resource_not_found", "Applicant not found");
//! assert!(error.is_not_found());
//! assert!(error.to_string().contains("Applicant not found"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error type for API responses that could not be decoded.
pub const UNKNOWN_INTERNAL_ERROR: &str = "unknown internal error";

/// Error type for field-level validation failures.
pub const VALIDATION_ERROR: &str = "validation_error";

/// Error type for missing or deleted resources.
pub const RESOURCE_NOT_FOUND: &str = "resource_not_found";

/// A structured error reported by the Onfido API.
///
/// `fields` maps a field name to whatever detail the API gave for it,
/// typically a list of messages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OnfidoError {
    /// Error category, e.g. `validation_error` or `resource_not_found`.
    #[serde(rename = "type", default)]
    pub error_type: String,
    /// Human readable description.
    #[serde(default)]
    pub message: String,
    /// Per-field validation detail.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// The `{"error": {...}}` wrapper of an error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: OnfidoError,
}

impl OnfidoError {
    /// Creates an error without field detail.
    #[must_use]
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            fields: serde_json::Map::new(),
        }
    }

    /// Creates a synthetic [`UNKNOWN_INTERNAL_ERROR`] with the given message.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_INTERNAL_ERROR, message)
    }

    /// Adds detail for a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, detail: serde_json::Value) -> Self {
        self.fields.insert(name.into(), detail);
        self
    }

    /// Returns `true` if the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.error_type == RESOURCE_NOT_FOUND
    }

    /// Returns `true` for field-level validation failures.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.error_type == VALIDATION_ERROR
    }

    /// Returns `true` if this error was synthesized from an undecodable body.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.error_type == UNKNOWN_INTERNAL_ERROR
    }
}

impl fmt::Display for OnfidoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnfidoError")?;
        if !self.error_type.is_empty() {
            write!(f, " - type: {}", self.error_type)?;
        }
        if !self.message.is_empty() {
            write!(f, " - message: {}", self.message)?;
        }
        if !self.fields.is_empty() {
            write!(f, " - fields:")?;
            let mut names: Vec<_> = self.fields.keys().collect();
            names.sort();
            for name in names {
                write!(f, " {name}: {}", self.fields[name])?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for OnfidoError {}
