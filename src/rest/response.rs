//! Response classification and list wrappers.
//!
//! [`classify`] maps an [`HttpResponse`] to either a decoded value or an
//! [`OnfidoError`]. [`ListResponse<T>`] pairs the items of a list call with
//! the [`PageDetails`] read from its headers, and implements `Deref` for
//! ergonomic access to the items:
//!
//! ```rust,ignore
//! let response = client.list_applicants(&ctx, &[]).await?;
//!
//! for applicant in response.iter() {
//!     println!("{}", applicant.id);
//! }
//!
//! if response.page().has_next_page() {
//!     // fetch the next page...
//! }
//! ```

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;

use crate::clients::HttpResponse;
use crate::rest::errors::{ErrorEnvelope, OnfidoError};
use crate::rest::pagination::PageDetails;

/// Maps a non-success response to its [`OnfidoError`].
///
/// 2xx responses pass. `302 Found` passes when `allow_found` is set. Any other
/// status has its body decoded as `{"error": {...}}`; a body that does not
/// decode becomes an `unknown internal error` carrying the decoder message.
///
/// # Errors
///
/// Returns the API's error for any status that does not pass.
pub fn check_status(response: &HttpResponse, allow_found: bool) -> Result<(), OnfidoError> {
    if response.is_ok() || (allow_found && response.is_found()) {
        return Ok(());
    }

    match response.json::<ErrorEnvelope>() {
        Ok(envelope) => Err(envelope.error),
        Err(e) => Err(OnfidoError::unknown(format!(
            "{} with undecodable error body: {e}",
            response.status
        ))),
    }
}

/// Classifies a response and decodes a success body into `T`.
///
/// # Errors
///
/// Returns the API's error for non-2xx responses, or an
/// `unknown internal error` when a 2xx body does not decode into `T`.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use onfido::clients::HttpResponse;
/// use onfido::rest::classify;
///
/// let ok = HttpResponse::new(200, HashMap::new(), br#"{"id": "abc"}"#.to_vec());
/// let value: serde_json::Value = classify(&ok).unwrap();
/// assert_eq!(value["id"], "abc");
///
/// let not_found = HttpResponse::new(
///     404,
///     HashMap::new(),
///     br#"{"error": {"type": "resource_not_found", "message": "Not found"}}"#.to_vec(),
/// );
/// let error = classify::<serde_json::Value>(&not_found).unwrap_err();
/// assert!(error.is_not_found());
/// ```
pub fn classify<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, OnfidoError> {
    check_status(response, false)?;
    response
        .json()
        .map_err(|e| OnfidoError::unknown(e.to_string()))
}

/// A page of items from a list operation.
///
/// # Example
///
/// ```rust
/// use onfido::rest::{ListResponse, PageDetails};
///
/// let response = ListResponse::new(
///     vec!["a", "b"],
///     PageDetails { next_page: Some(2), ..PageDetails::default() },
/// );
///
/// assert_eq!(response.len(), 2);
/// assert!(response.page().has_next_page());
/// ```
#[derive(Clone, Debug)]
pub struct ListResponse<T> {
    items: Vec<T>,
    page: PageDetails,
}

impl<T> ListResponse<T> {
    /// Creates a new `ListResponse`.
    #[must_use]
    pub const fn new(items: Vec<T>, page: PageDetails) -> Self {
        Self { items, page }
    }

    /// Returns the pagination details of this page.
    #[must_use]
    pub const fn page(&self) -> &PageDetails {
        &self.page
    }

    /// Consumes the response and returns the items.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    /// Consumes the response and returns the items with their page details.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, PageDetails) {
        (self.items, self.page)
    }
}

impl<T> Deref for ListResponse<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> DerefMut for ListResponse<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl<T> IntoIterator for ListResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
