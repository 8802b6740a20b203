//! HTTP client for Onfido API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the Onfido API with automatic retry handling.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};

use crate::clients::context::Context;
use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{parse_retry_after, AttemptOutcome, RetryDecision, RetryPolicy};
use crate::config::OnfidoConfig;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Onfido API.
///
/// The client handles:
/// - Endpoint construction from the configured region and API version
/// - Default headers including `Authorization` and `User-Agent`
/// - Fixed-wait retries for transport failures, 429 and 5xx responses
/// - Cancellation through a [`Context`]
///
/// Redirects are never followed: a `302 Found` is returned to the caller
/// so that download locations can be read from the `Location` header.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use onfido::{ApiToken, Context, OnfidoConfig};
/// use onfido::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let config = OnfidoConfig::builder()
///     .api_token(ApiToken::new("api_token")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/applicants").build()?;
/// let response = client.request(&Context::background(), request).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// Connection pool; `None` after [`close`](Self::close) until next use.
    client: RwLock<Option<reqwest::Client>>,
    /// Base URL including the API version (e.g. `https://api.eu.onfido.com/v3.6`).
    endpoint: String,
    /// Per-attempt timeout.
    timeout: Duration,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
    /// Retry behavior for requests without an override.
    retry_policy: RetryPolicy,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &OnfidoConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Onfido-Rust/{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert(
            "Authorization".to_string(),
            config.api_token().authorization_header(),
        );
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = build_client(config.timeout())?;
        let endpoint = config.endpoint();

        tracing::debug!(endpoint = %endpoint, retries = config.retries(), "created Onfido HTTP client");

        Ok(Self {
            client: RwLock::new(Some(client)),
            endpoint,
            timeout: config.timeout(),
            default_headers,
            retry_policy: RetryPolicy::new(config.retries(), config.retry_wait()),
        })
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the default retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Releases pooled idle connections.
    ///
    /// The client stays usable; a fresh pool is created on the next request.
    pub fn close(&self) {
        let mut guard = self.client.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            tracing::debug!(endpoint = %self.endpoint, "closed Onfido HTTP client connections");
        }
    }

    /// Returns the live connection pool, creating one after a close.
    fn pool(&self) -> Result<reqwest::Client, HttpError> {
        if let Some(client) = self
            .client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(client.clone());
        }

        let mut guard = self.client.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        let client = build_client(self.timeout)?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Sends an HTTP request to the Onfido API.
    ///
    /// Retryable failures (transport errors, 429, 5xx) are retried up to the
    /// request's budget. Once retrying stops, the last response is returned
    /// whatever its status; interpreting it is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request URL cannot be built (`InvalidUrl`), which is never retried
    /// - Every attempt failed without a response (`Network`)
    /// - The context was cancelled or its deadline passed (`Cancelled`, `DeadlineExceeded`)
    /// - The response body could not be read (`ReadBody`)
    pub async fn request(
        &self,
        ctx: &Context,
        request: HttpRequest,
    ) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}", self.endpoint, request.path);
        let headers = self.merge_headers(&request)?;
        let policy = RetryPolicy::new(
            request.retries.unwrap_or_else(|| self.retry_policy.retries()),
            request
                .retry_wait
                .unwrap_or_else(|| self.retry_policy.wait()),
        );
        let client = self.pool()?;

        let mut attempt: u32 = 0;
        loop {
            ctx.check()?;

            let mut req_builder = client
                .request(request.http_method.into(), &url)
                .headers(headers.clone());
            if !request.query.is_empty() {
                req_builder = req_builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.bytes.clone());
            }

            let result = match ctx.run(req_builder.send()).await? {
                Err(source) if source.is_builder() => {
                    return Err(HttpError::InvalidUrl { url, source });
                }
                other => other,
            };

            let outcome = match &result {
                Ok(res) => AttemptOutcome::Response {
                    code: res.status().as_u16(),
                    retry_after: retry_after_header(res.headers()),
                },
                Err(_) => AttemptOutcome::TransportError,
            };

            match policy.decide(attempt, outcome) {
                RetryDecision::RetryAfter(wait) => {
                    tracing::debug!(
                        method = %request.http_method,
                        path = %request.path,
                        attempt,
                        ?wait,
                        ?outcome,
                        "retrying Onfido API request"
                    );
                    // drops the connection of the discarded attempt
                    drop(result);
                    ctx.sleep(wait).await?;
                    attempt += 1;
                }
                RetryDecision::Stop => {
                    if policy.retries() > 0 && is_retryable(outcome) {
                        tracing::warn!(
                            method = %request.http_method,
                            path = %request.path,
                            attempts = attempt + 1,
                            "Onfido API request retry budget exhausted"
                        );
                    }
                    return match result {
                        Ok(res) => Self::read_response(ctx, res).await,
                        Err(source) => Err(HttpError::Network {
                            attempts: attempt + 1,
                            source,
                        }),
                    };
                }
            }
        }
    }

    /// Merges default headers, the body content type and per-request headers.
    ///
    /// Per-request headers replace defaults of the same name.
    fn merge_headers(&self, request: &HttpRequest) -> Result<HeaderMap, HttpError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }
        if let Some(body) = &request.body {
            headers.insert(
                reqwest::header::CONTENT_TYPE,
                header_value("Content-Type", &body.content_type)?,
            );
        }
        for (name, values) in &request.extra_headers {
            let key = header_name(name)?;
            headers.remove(&key);
            for value in values {
                headers.append(key.clone(), header_value(name, value)?);
            }
        }
        Ok(headers)
    }

    async fn read_response(
        ctx: &Context,
        res: reqwest::Response,
    ) -> Result<HttpResponse, HttpError> {
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = ctx
            .run(res.bytes())
            .await?
            .map_err(HttpError::ReadBody)?;
        Ok(HttpResponse::new(code, headers, body.to_vec()))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, HttpError> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout)
        .build()
        .map_err(HttpError::ClientBuild)
}

fn retry_after_header(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after)
}

const fn is_retryable(outcome: AttemptOutcome) -> bool {
    match outcome {
        AttemptOutcome::TransportError => true,
        AttemptOutcome::Response { code, .. } => crate::clients::retry::is_retryable_status(code),
    }
}

fn header_name(name: &str) -> Result<HeaderName, InvalidHttpRequestError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| InvalidHttpRequestError::InvalidHeader {
        name: name.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, InvalidHttpRequestError> {
    HeaderValue::from_str(value).map_err(|_| InvalidHttpRequestError::InvalidHeader {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::http_request::HttpMethod;
    use crate::config::ApiToken;

    fn create_test_config() -> OnfidoConfig {
        OnfidoConfig::builder()
            .api_token(ApiToken::new("test-token").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_client_endpoint_defaults_to_eu() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert_eq!(client.endpoint(), "https://api.eu.onfido.com/v3.6");
    }

    #[test]
    fn test_authorization_header_injection() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Token token=test-token".to_string())
        );
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert_eq!(user_agent, &format!("Onfido-Rust/{SDK_VERSION}"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = OnfidoConfig::builder()
            .api_token(ApiToken::new("test-token").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();
        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | Onfido-Rust/"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_request_headers_replace_defaults() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = HttpRequest::builder(HttpMethod::Post, "/applicants")
            .json(&serde_json::json!({}))
            .header("Accept", "application/pdf")
            .build()
            .unwrap();

        let headers = client.merge_headers(&request).unwrap();
        let accept: Vec<_> = headers.get_all("accept").iter().collect();
        assert_eq!(accept, vec!["application/pdf"]);
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let request = HttpRequest::builder(HttpMethod::Get, "/applicants")
            .header("X-Bad", "line\nbreak")
            .build()
            .unwrap();

        assert!(matches!(
            client.merge_headers(&request),
            Err(HttpError::InvalidRequest(InvalidHttpRequestError::InvalidHeader { name }))
                if name == "X-Bad"
        ));
    }

    #[test]
    fn test_close_keeps_client_usable() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        client.close();
        client.close();
        assert!(client.pool().is_ok());
    }

    #[test]
    fn test_retry_after_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after_header(&headers), Some(Duration::from_secs(3)));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after_header(&headers), None);
    }

    #[tokio::test]
    async fn test_unbuildable_url_fails_without_retry() {
        let mut client = HttpClient::new(&create_test_config()).unwrap();
        client.endpoint = "http:/v3.6".to_string();
        let request = HttpRequest::builder(HttpMethod::Get, "/applicants")
            .retries(3, Duration::from_millis(200))
            .build()
            .unwrap();

        let started = std::time::Instant::now();
        let result = client.request(&Context::background(), request).await;

        assert!(matches!(
            result,
            Err(HttpError::InvalidUrl { ref url, .. }) if url == "http:/v3.6/applicants"
        ));
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
