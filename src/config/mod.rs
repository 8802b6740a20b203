//! Configuration types for the Onfido API client.
//!
//! # Overview
//!
//! - [`OnfidoConfig`]: immutable client settings (token, endpoint, retry defaults)
//! - [`OnfidoConfigBuilder`]: builder for [`OnfidoConfig`]
//! - [`ApiToken`]: a validated API token newtype with masked debug output
//! - [`Region`]: the API region selecting the base hostname
//!
//! Retry defaults live on the configuration instance rather than in any
//! process-wide setting, so test and production clients never share them.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use onfido::{ApiToken, OnfidoConfig, Region};
//!
//! let config = OnfidoConfig::builder()
//!     .api_token(ApiToken::new("api_sandbox.token").unwrap())
//!     .region(Region::Us)
//!     .retries(3, Duration::from_secs(1))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.endpoint(), "https://api.us.onfido.com/v3.6");
//! ```

mod newtypes;
mod region;

pub use newtypes::ApiToken;
pub use region::Region;

use std::time::Duration;

use crate::error::ConfigError;

/// The Onfido API version targeted by this client.
pub const LATEST_API_VERSION: &str = "v3.6";

/// Wait between retries when retries are enabled without an explicit wait.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(2);

/// Overall timeout for a single attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Onfido API client.
///
/// `OnfidoConfig` is `Clone`, `Send`, and `Sync`. All values are fixed once
/// built.
#[derive(Clone, Debug)]
pub struct OnfidoConfig {
    api_token: ApiToken,
    region: Region,
    base_url: Option<String>,
    api_version: String,
    retries: u32,
    retry_wait: Duration,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl OnfidoConfig {
    /// Creates a new builder for constructing an `OnfidoConfig`.
    #[must_use]
    pub fn builder() -> OnfidoConfigBuilder {
        OnfidoConfigBuilder::new()
    }

    /// Returns the API token.
    #[must_use]
    pub const fn api_token(&self) -> &ApiToken {
        &self.api_token
    }

    /// Returns the configured region.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Returns the API version path segment (e.g. `v3.6`).
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the full endpoint every request path is appended to.
    ///
    /// This is `{base}/{api_version}` where `base` is the region host or the
    /// configured base URL override.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let base = self
            .base_url
            .clone()
            .unwrap_or_else(|| self.region.base_url());
        format!("{}/{}", base.trim_end_matches('/'), self.api_version)
    }

    /// Returns the default retry budget applied to every operation.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the fixed wait between retry attempts.
    #[must_use]
    pub const fn retry_wait(&self) -> Duration {
        self.retry_wait
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify OnfidoConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OnfidoConfig>();
};

/// Builder for constructing [`OnfidoConfig`] instances.
///
/// `api_token` is required.
///
/// # Defaults
///
/// - `region`: [`Region::Eu`]
/// - `api_version`: [`LATEST_API_VERSION`]
/// - `retries`: 0 (a single attempt)
/// - `retry_wait`: [`DEFAULT_RETRY_WAIT`]
/// - `timeout`: [`DEFAULT_TIMEOUT`]
#[derive(Debug, Default)]
pub struct OnfidoConfigBuilder {
    api_token: Option<ApiToken>,
    region: Option<Region>,
    base_url: Option<String>,
    api_version: Option<String>,
    retries: Option<u32>,
    retry_wait: Option<Duration>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl OnfidoConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API token (required).
    #[must_use]
    pub fn api_token(mut self, token: ApiToken) -> Self {
        self.api_token = Some(token);
        self
    }

    /// Sets the API region.
    #[must_use]
    pub const fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Overrides the base URL, replacing the region host.
    ///
    /// Intended for proxies and mock servers.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API version path segment.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the retry budget and the fixed wait between attempts.
    ///
    /// A zero `wait` with a non-zero budget falls back to [`DEFAULT_RETRY_WAIT`].
    #[must_use]
    pub const fn retries(mut self, retries: u32, wait: Duration) -> Self {
        self.retries = Some(retries);
        self.retry_wait = Some(wait);
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`OnfidoConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_token` is not set,
    /// or [`ConfigError::InvalidBaseUrl`] if the base URL override is not an
    /// absolute http(s) URL with a host.
    pub fn build(self) -> Result<OnfidoConfig, ConfigError> {
        let api_token = self
            .api_token
            .ok_or(ConfigError::MissingRequiredField { field: "api_token" })?;

        if let Some(url) = &self.base_url {
            validate_base_url(url)?;
        }

        let retries = self.retries.unwrap_or(0);
        let retry_wait = match self.retry_wait {
            Some(wait) if !wait.is_zero() => wait,
            _ => DEFAULT_RETRY_WAIT,
        };

        Ok(OnfidoConfig {
            api_token,
            region: self.region.unwrap_or_default(),
            base_url: self.base_url,
            api_version: self
                .api_version
                .unwrap_or_else(|| LATEST_API_VERSION.to_string()),
            retries,
            retry_wait,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

fn validate_base_url(url: &str) -> Result<(), ConfigError> {
    let invalid = || ConfigError::InvalidBaseUrl {
        url: url.to_string(),
    };
    let parsed = reqwest::Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
