//! Configuration types for the Valence client.
//!
//! This module provides the configuration used to construct the transport
//! and the top-level [`Client`](crate::Client).
//!
//! # Overview
//!
//! - [`ValenceConfig`]: Connection and retry settings
//! - [`ValenceConfigBuilder`]: A builder for constructing [`ValenceConfig`] instances
//! - [`BaseUrl`]: A validated, normalized Valence endpoint URL
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use valence_client::{BaseUrl, ValenceConfig};
//!
//! let config = ValenceConfig::builder()
//!     .base_url(BaseUrl::new("http://valence.local:8181").unwrap())
//!     .max_retries(3)
//!     .retry_interval(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.max_retries(), 3);
//! ```

mod newtypes;

pub use newtypes::{BaseUrl, API_VERSION_PREFIX};

use std::time::Duration;

use crate::error::ConfigError;

/// Default number of retries after a connection-level failure.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default pause between retries.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default ceiling on followed 302/305 redirects.
pub const DEFAULT_MAX_REDIRECTS: u32 = 5;

/// Configuration for the Valence client.
///
/// # Thread Safety
///
/// `ValenceConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use valence_client::{BaseUrl, ValenceConfig};
///
/// let config = ValenceConfig::builder()
///     .base_url(BaseUrl::new("http://valence.local").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_retries(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct ValenceConfig {
    base_url: BaseUrl,
    max_retries: u32,
    retry_interval: Duration,
    timeout: Duration,
    connect_timeout: Duration,
    max_redirects: u32,
    user_agent_prefix: Option<String>,
}

impl ValenceConfig {
    /// Creates a new builder for constructing a `ValenceConfig`.
    #[must_use]
    pub fn builder() -> ValenceConfigBuilder {
        ValenceConfigBuilder::new()
    }

    /// Returns the normalized Valence endpoint.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns how many times a failed connection is retried.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the pause between retries.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the maximum number of redirects followed for one request.
    #[must_use]
    pub const fn max_redirects(&self) -> u32 {
        self.max_redirects
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ValenceConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ValenceConfig>();
};

/// Builder for constructing [`ValenceConfig`] instances.
///
/// The only required field is `base_url`.
///
/// # Defaults
///
/// - `max_retries`: 5
/// - `retry_interval`: 2 seconds
/// - `timeout`: 60 seconds
/// - `connect_timeout`: 10 seconds
/// - `max_redirects`: 5
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ValenceConfigBuilder {
    base_url: Option<BaseUrl>,
    max_retries: Option<u32>,
    retry_interval: Option<Duration>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    max_redirects: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl ValenceConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Valence endpoint (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets how many times a failed connection is retried. Use 0 to disable retrying.
    #[must_use]
    pub const fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Sets the pause between retries. Must be at least one second.
    #[must_use]
    pub const fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of 302/305 redirects followed for one request.
    #[must_use]
    pub const fn max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = Some(max);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ValenceConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not set,
    /// or [`ConfigError::InvalidRetryInterval`] if the retry interval is
    /// shorter than one second.
    pub fn build(self) -> Result<ValenceConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let retry_interval = self.retry_interval.unwrap_or(DEFAULT_RETRY_INTERVAL);
        if retry_interval < Duration::from_secs(1) {
            return Err(ConfigError::InvalidRetryInterval {
                millis: retry_interval.as_millis(),
            });
        }

        Ok(ValenceConfig {
            base_url,
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_interval,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            max_redirects: self.max_redirects.unwrap_or(DEFAULT_MAX_REDIRECTS),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> BaseUrl {
        BaseUrl::new("http://valence.local:8181").unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = ValenceConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "base_url" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ValenceConfig::builder().base_url(base_url()).build().unwrap();

        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.retry_interval(), Duration::from_secs(2));
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.max_redirects(), 5);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_builder_rejects_sub_second_retry_interval() {
        let result = ValenceConfig::builder()
            .base_url(base_url())
            .retry_interval(Duration::from_millis(500))
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidRetryInterval { millis: 500 })
        ));
    }

    #[test]
    fn test_builder_accepts_zero_retries() {
        let config = ValenceConfig::builder()
            .base_url(base_url())
            .max_retries(0)
            .build()
            .unwrap();

        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = ValenceConfig::builder()
            .base_url(base_url())
            .max_retries(2)
            .retry_interval(Duration::from_secs(1))
            .timeout(Duration::from_secs(5))
            .connect_timeout(Duration::from_secs(1))
            .max_redirects(1)
            .user_agent_prefix("rsd-tools/1.0")
            .build()
            .unwrap();

        assert_eq!(config.base_url().as_ref(), "http://valence.local:8181");
        assert_eq!(config.max_retries(), 2);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.max_redirects(), 1);
        assert_eq!(config.user_agent_prefix(), Some("rsd-tools/1.0"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValenceConfig>();
    }
}
