//! Response interpretation for the Onfido REST API.
//!
//! This module sits between the raw transport and the typed operations:
//!
//! - **[`classify`] / [`check_status`]**: map a response to a decoded value or an [`OnfidoError`]
//! - **[`OnfidoError`]**: the API's structured error body
//! - **[`PageDetails`]**: position of a list response, read from `Link` and `X-Total-Count`
//! - **[`ListResponse<T>`]**: a Deref-based wrapper pairing list items with their page details
//! - **[`Pagination`] / [`SortDirection`]**: options shared by list operations

mod errors;
mod pagination;
mod response;

pub use errors::{OnfidoError, RESOURCE_NOT_FOUND, UNKNOWN_INTERNAL_ERROR, VALIDATION_ERROR};
pub(crate) use pagination::PageParams;
pub use pagination::{PageDetails, Pagination, SortDirection};
pub use response::{check_status, classify, ListResponse};
