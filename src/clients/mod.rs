//! HTTP transport for Onfido API communication.
//!
//! This module provides the foundational HTTP client layer for making
//! authenticated requests to the Onfido API. It handles request encoding,
//! retry logic, cancellation and response capture.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request descriptor to be sent to the API
//! - [`HttpResponse`]: The captured status, headers and body of a response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`RequestBody`]: A pre-encoded JSON, form or multipart body
//! - [`MultipartForm`]: Multipart form builder with content-sniffed file parts
//! - [`RetryPolicy`]: The fixed-wait retry decision
//! - [`Context`]: Cancellation and deadline for a call
//!
//! # Example
//!
//! ```rust,ignore
//! use onfido::{ApiToken, Context, OnfidoConfig};
//! use onfido::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let config = OnfidoConfig::builder()
//!     .api_token(ApiToken::new("api_token")?)
//!     .retries(3, std::time::Duration::from_secs(2))
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/applicants").build()?;
//! let response = client.request(&Context::background(), request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **Transport failure** (DNS, connect, timeout): retried after the fixed wait
//! - **429 (Rate Limited)**: retried after `Retry-After` seconds, or the fixed wait
//! - **5xx (Server Error)**: retried after the fixed wait
//! - **Anything else**: returned immediately
//!
//! The default budget is 0, meaning no automatic retries. Configure it on
//! [`OnfidoConfig`](crate::OnfidoConfig) or per request with
//! [`HttpRequestBuilder::retries`].

mod context;
mod errors;
mod http_client;
mod http_request;
mod http_response;
mod multipart;
mod retry;

pub use context::Context;
pub use errors::{HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody};
pub use http_response::HttpResponse;
pub use multipart::{sniff_content_type, MultipartForm};
pub use retry::{
    is_retryable_status, parse_retry_after, AttemptOutcome, RetryDecision, RetryPolicy,
};
