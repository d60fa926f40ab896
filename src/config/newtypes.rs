//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// The API version prefix every Valence path lives under.
pub const API_VERSION_PREFIX: &str = "/v1";

/// A validated, normalized Valence endpoint URL.
///
/// The URL is parsed once on construction. The scheme must be `http` or
/// `https`. Trailing slashes and a trailing `/v1` API version suffix are
/// stripped, so joining a partial path always yields exactly one slash
/// between the base and the path.
///
/// # Example
///
/// ```rust
/// use valence_client::BaseUrl;
///
/// let url = BaseUrl::new("http://valence.local:8181/v1/").unwrap();
/// assert_eq!(url.to_string(), "http://valence.local:8181");
/// assert_eq!(url.join("/v1/nodes"), "http://valence.local:8181/v1/nodes");
/// assert_eq!(url.join("v1/nodes"), "http://valence.local:8181/v1/nodes");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL cannot be parsed,
    /// has no host, or uses a scheme other than `http`/`https`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let trimmed = raw.trim();

        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidBaseUrl {
                    url: raw.clone(),
                    reason: format!("unsupported scheme '{other}'"),
                })
            }
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw,
                reason: "missing host".to_string(),
            });
        }

        Ok(Self {
            url: Self::normalize(trimmed),
        })
    }

    /// Strips trailing slashes and the API version suffix.
    fn normalize(url: &str) -> String {
        let url = url.trim_end_matches('/');
        let url = url.strip_suffix(API_VERSION_PREFIX).unwrap_or(url);
        url.trim_end_matches('/').to_string()
    }

    /// Joins a partial path onto this base URL.
    ///
    /// Leading slashes on `path` are ignored so the result always has exactly
    /// one slash between base and path. Absolute `http(s)://` targets are
    /// returned unchanged.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
