//! The Onfido API client.
//!
//! [`OnfidoClient`] owns the transport and the configured defaults. Resource
//! operations (applicants, documents, workflow runs) are implemented on it in
//! the [`resources`](crate::resources) module.

use serde::de::DeserializeOwned;

use crate::clients::{Context, HttpClient, HttpRequest, HttpResponse};
use crate::config::OnfidoConfig;
use crate::error::Error;
use crate::rest::{check_status, classify, ListResponse, OnfidoError, PageDetails};

/// Client for the Onfido identity verification API.
///
/// The client is `Send + Sync`; share it behind an `Arc` to issue requests
/// from several tasks at once. Every operation takes a [`Context`] for
/// cancellation and deadlines.
///
/// # Example
///
/// ```rust,ignore
/// use onfido::{ApiToken, Context, OnfidoClient, OnfidoConfig, Region};
/// use onfido::resources::CreateApplicantPayload;
///
/// let config = OnfidoConfig::builder()
///     .api_token(ApiToken::new(std::env::var("ONFIDO_API_TOKEN")?)?)
///     .region(Region::Eu)
///     .build()?;
/// let client = OnfidoClient::new(config)?;
///
/// let applicant = client
///     .create_applicant(
///         &Context::background(),
///         &CreateApplicantPayload::new("Jane", "Doe"),
///     )
///     .await?;
/// println!("created applicant {}", applicant.id);
/// ```
#[derive(Debug)]
pub struct OnfidoClient {
    http_client: HttpClient,
    config: OnfidoConfig,
}

// Verify OnfidoClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OnfidoClient>();
};

impl OnfidoClient {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be created.
    pub fn new(config: OnfidoConfig) -> Result<Self, Error> {
        let http_client = HttpClient::new(&config)?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &OnfidoConfig {
        &self.config
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Releases pooled idle connections.
    ///
    /// The client remains usable; connections are re-established on the
    /// next request.
    pub fn close(&self) {
        self.http_client.close();
    }

    /// Sends a raw request and returns the response whatever its status.
    ///
    /// Use this for endpoints without a dedicated operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Cancelled`] if no response was
    /// obtained.
    pub async fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<HttpResponse, Error> {
        Ok(self.http_client.request(ctx, request).await?)
    }

    /// Sends a request and decodes a success body into `T`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: HttpRequest,
    ) -> Result<T, Error> {
        let response = self.execute(ctx, request).await?;
        Ok(classify(&response)?)
    }

    /// Sends a request whose success body is ignored.
    pub(crate) async fn fetch_empty(&self, ctx: &Context, request: HttpRequest) -> Result<(), Error> {
        let response = self.execute(ctx, request).await?;
        Ok(check_status(&response, false)?)
    }

    /// Sends a list request, unwraps its envelope and reads page details.
    pub(crate) async fn fetch_list<E, T>(
        &self,
        ctx: &Context,
        request: HttpRequest,
        unwrap: impl FnOnce(E) -> Vec<T>,
    ) -> Result<ListResponse<T>, Error>
    where
        E: DeserializeOwned,
    {
        let response = self.execute(ctx, request).await?;
        let envelope: E = classify(&response)?;
        Ok(ListResponse::new(
            unwrap(envelope),
            PageDetails::from_response(&response),
        ))
    }

    /// Downloads a binary body. A `302 Found` is not treated as an error.
    pub(crate) async fn download(&self, ctx: &Context, request: HttpRequest) -> Result<Vec<u8>, Error> {
        let path = request.path.clone();
        let response = self.execute(ctx, request).await?;
        check_status(&response, true)?;

        if response.body.is_empty() {
            return Err(OnfidoError::unknown(format!("unable to download {path}: empty body")).into());
        }
        Ok(response.body)
    }

    /// Resolves a resource served as a `302 Found` to its `Location`.
    pub(crate) async fn resolve_location(
        &self,
        ctx: &Context,
        request: HttpRequest,
    ) -> Result<String, Error> {
        let path = request.path.clone();
        let response = self.execute(ctx, request).await?;
        check_status(&response, true)?;

        response.location().map(str::to_string).ok_or_else(|| {
            OnfidoError::unknown(format!("no location returned for {path}")).into()
        })
    }
}

/// Rejects an empty identifier before any request is made.
pub(crate) fn require_id(value: &str, field: &'static str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Validation { field });
    }
    Ok(())
}

/// Builds `/{collection}/{id}{suffix}` with the id percent-encoded.
pub(crate) fn resource_path(collection: &str, id: &str, suffix: &str) -> String {
    format!("/{collection}/{}{suffix}", urlencoding::encode(id))
}
