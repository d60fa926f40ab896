//! Error types for client configuration.
//!
//! This module contains the error raised while building a
//! [`ValenceConfig`](crate::ValenceConfig) or validating one of its values.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Nothing touches the network until a configuration
//! has been accepted.
//!
//! # Example
//!
//! ```rust
//! use valence_client::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("ftp://valence.local");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The Valence endpoint URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid Valence URL '{url}': {reason}. Please provide a URL such as 'http://valence.example.com:8181'.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// The retry interval is below the one second minimum.
    #[error("Invalid retry interval of {millis}ms. The interval between retries must be at least 1 second.")]
    InvalidRetryInterval {
        /// The rejected interval in milliseconds.
        millis: u128,
    },
}
