//! Error types for the Redfish sub-client.

use thiserror::Error;

use crate::clients::HttpMethod;

/// Errors returned by [`RedfishClient`](super::RedfishClient) and the
/// resources it loads.
#[derive(Debug, Error)]
pub enum RedfishError {
    /// A link or field the operation depends on is absent from the document.
    #[error("The attribute {attribute} is missing from the resource {resource}")]
    MissingAttribute {
        /// The missing attribute, e.g. `Processors`.
        attribute: String,
        /// Path of the resource that lacks it.
        resource: String,
    },

    /// The resource does not advertise the requested action.
    #[error("The action {action} is missing from the resource {resource}")]
    MissingAction {
        /// The action name, e.g. `#ComposedNode.Reset`.
        action: String,
        /// Path of the resource that lacks it.
        resource: String,
    },

    /// A value is not among the values the service accepts.
    #[error("The parameter \"{parameter}\" value \"{value}\" is invalid. Valid values are: {valid_values}")]
    InvalidParameterValue {
        /// The parameter name.
        parameter: &'static str,
        /// The rejected value.
        value: String,
        /// Comma-separated accepted values.
        valid_values: String,
    },

    /// The service answered with a non-success status.
    #[error("HTTP {method} {url} returned code {status}. {message}")]
    Http {
        /// The request method.
        method: HttpMethod,
        /// The request URL.
        url: String,
        /// The response status code.
        status: u16,
        /// The service's error message, or the raw body.
        message: String,
    },

    /// The service could not be reached.
    #[error("Unable to connect to {url}: {source}")]
    Connection {
        /// The request URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The document could not be decoded into the expected shape.
    #[error("Unable to decode {resource} at {path}: {source}")]
    Decode {
        /// The resource kind being decoded.
        resource: &'static str,
        /// Path the document was loaded from.
        path: String,
        /// The decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The service URL could not be parsed or joined.
    #[error("Invalid Redfish URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL or path.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl RedfishError {
    /// Returns the HTTP status for [`RedfishError::Http`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RedfishError>();
};
