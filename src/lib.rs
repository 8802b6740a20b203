//! # Onfido API Rust Client
//!
//! An async Rust client for the Onfido identity verification API, covering
//! applicants, documents and workflow runs.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`OnfidoConfig`] and [`OnfidoConfigBuilder`]
//! - Region selection ([`Region`]) and a masked API token newtype ([`ApiToken`])
//! - An async HTTP transport with fixed-wait retries and `Retry-After` support
//! - Cancellation and deadlines for every call through [`Context`]
//! - A single error type, [`Error`], separating local validation, API errors,
//!   transport failures and cancellation
//! - Page details read from the `Link` and `X-Total-Count` headers of list calls
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use onfido::{ApiToken, OnfidoConfig, Region};
//!
//! let config = OnfidoConfig::builder()
//!     .api_token(ApiToken::new("api_sandbox.your-token").unwrap())
//!     .region(Region::Eu)
//!     .retries(3, Duration::from_secs(2))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.endpoint(), "https://api.eu.onfido.com/v3.6");
//! ```
//!
//! ## Making Calls
//!
//! ```rust,ignore
//! use onfido::{Context, OnfidoClient};
//! use onfido::resources::{CreateApplicantPayload, ListApplicantsOption};
//! use onfido::rest::Pagination;
//!
//! let client = OnfidoClient::new(config)?;
//! let ctx = Context::background().with_timeout(Duration::from_secs(60));
//!
//! let applicant = client
//!     .create_applicant(&ctx, &CreateApplicantPayload::new("Jane", "Doe"))
//!     .await?;
//!
//! let page = client
//!     .list_applicants(&ctx, &[Pagination::Limit(20).into()])
//!     .await?;
//! if let Some(next) = page.page().next_page {
//!     // fetch page `next`...
//! }
//!
//! match client.retrieve_applicant(&ctx, "missing").await {
//!     Err(e) if e.is_not_found() => println!("gone"),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: retries at `debug`, exhausted retry
//! budgets at `warn`. Install a subscriber in your application to see them.

mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod resources;
pub mod rest;

// Re-export public types at crate root for convenience
pub use client::OnfidoClient;
pub use config::{ApiToken, OnfidoConfig, OnfidoConfigBuilder, Region};
pub use error::{ConfigError, Error};

// Re-export transport types
pub use clients::{
    Context, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError,
};

// Re-export response interpretation types
pub use rest::{ListResponse, OnfidoError, PageDetails, Pagination, SortDirection};
