//! Resource-specific error types for manager operations.
//!
//! This module contains error types for resource operations, extending the
//! transport's [`HttpError`] with client-side semantics like
//! `InvalidAttribute` and the "find exactly one" outcomes.
//!
//! # Error Handling
//!
//! - [`ResourceError::InvalidAttribute`] - rejected before any network call
//! - [`ResourceError::NotFound`] / [`ResourceError::NoUniqueMatch`] - from `find`
//! - [`ResourceError::EmptyResponse`] - a create or action returned no resource
//! - [`ResourceError::Http`] - wrapped transport error (classified responses,
//!   connection failures after retries, validation failures)
//!
//! # Example
//!
//! ```rust,ignore
//! use valence_client::rest::ResourceError;
//!
//! match client.nodes.compose_node(request).await {
//!     Ok(node) => println!("composed {}", node),
//!     Err(ResourceError::InvalidAttribute { attributes, .. }) => {
//!         println!("unexpected fields: {attributes:?}");
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, HttpErrorKind};

fn joined(attributes: &[String]) -> String {
    attributes.join("\",\"")
}

/// Error type for resource manager operations.
///
/// # Example
///
/// ```rust
/// use valence_client::rest::ResourceError;
///
/// let error = ResourceError::InvalidAttribute {
///     resource: "pod_managers",
///     attributes: vec!["color".to_string(), "size".to_string()],
/// };
/// assert_eq!(
///     error.to_string(),
///     r#"The attribute(s) "color","size" are invalid: they are not needed to create pod_managers."#
/// );
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A creation attribute is not in the resource's allow-list.
    ///
    /// Raised before any network call and never retried.
    #[error(
        "The attribute(s) \"{}\" are invalid: they are not needed to create {resource}.",
        joined(.attributes)
    )]
    InvalidAttribute {
        /// The collection name of the resource being created.
        resource: &'static str,
        /// The offending attribute names, in the order given.
        attributes: Vec<String>,
    },

    /// No resource matched the filters of a `find`.
    #[error("No {resource} matching {filters}.")]
    NotFound {
        /// The type name of the resource.
        resource: &'static str,
        /// The filters that were applied, as a query string.
        filters: String,
    },

    /// More than one resource matched the filters of a `find`.
    #[error("Multiple {resource} matches found for {filters}, use an ID to be more specific.")]
    NoUniqueMatch {
        /// The type name of the resource.
        resource: &'static str,
        /// The filters that were applied, as a query string.
        filters: String,
    },

    /// A create or action succeeded but the server returned no resource.
    #[error("The server returned no {resource} from {operation}.")]
    EmptyResponse {
        /// The type name of the resource.
        resource: &'static str,
        /// The operation that was performed (e.g., "create", "manage").
        operation: &'static str,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Returns the classified HTTP error kind, if this wraps an error response.
    #[must_use]
    pub const fn http_kind(&self) -> Option<HttpErrorKind> {
        match self {
            Self::Http(e) => e.kind(),
            _ => None,
        }
    }

    /// Returns `true` for errors raised client-side, without a server round trip.
    #[must_use]
    pub const fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::InvalidAttribute { .. } | Self::Http(HttpError::Validation(_))
        )
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
