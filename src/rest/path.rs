//! Path and query building for resource managers.
//!
//! Every manager operation builds its URL deterministically from the
//! collection name and, where applicable, a resource identifier:
//!
//! - collection: `/v1/{collection}`
//! - item: `/v1/{collection}/{id}`
//! - action: `/v1/{collection}{suffix}` (e.g., `/v1/nodes/manage`)
//!
//! Query strings are fully percent-encoded.
//!
//! # Example
//!
//! ```rust
//! use valence_client::rest::{build_query, collection_path};
//!
//! assert_eq!(collection_path("nodes", None), "/v1/nodes");
//! assert_eq!(collection_path("nodes", Some("n-1")), "/v1/nodes/n-1");
//! assert_eq!(build_query(&[("podm_id", "a b")]), "?podm_id=a%20b");
//! ```

use crate::clients::HttpMethod;
use crate::config::API_VERSION_PREFIX;

/// Operations a resource manager performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// List a collection (GET /v1/{collection}).
    List,
    /// Fetch one resource (GET /v1/{collection}/{id}).
    Get,
    /// Create a resource (POST /v1/{collection}).
    Create,
    /// Update a resource (PATCH /v1/{collection}/{id}).
    Update,
    /// Delete a resource (DELETE /v1/{collection}/{id}).
    Delete,
    /// Invoke a collection action (POST /v1/{collection}{suffix}).
    Manage,
}

impl ResourceOperation {
    /// Returns the default HTTP method for this operation.
    #[must_use]
    pub const fn default_http_method(&self) -> HttpMethod {
        match self {
            Self::List | Self::Get => HttpMethod::Get,
            Self::Create | Self::Manage => HttpMethod::Post,
            Self::Update => HttpMethod::Patch,
            Self::Delete => HttpMethod::Delete,
        }
    }

    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }
}

/// Builds the path of a collection, or of one item in it.
///
/// The identifier is percent-encoded as a single path segment.
#[must_use]
pub fn collection_path(collection: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!(
            "{API_VERSION_PREFIX}/{collection}/{}",
            urlencoding::encode(id)
        ),
        None => format!("{API_VERSION_PREFIX}/{collection}"),
    }
}

/// Builds a `?k=v&...` query string, or an empty string for no pairs.
///
/// Keys and values are percent-encoded. Pair order is preserved.
#[must_use]
pub fn build_query<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let joined = pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}

/// Renders filters for error messages (`k=v, ...`), unencoded.
pub(crate) fn describe_filters<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
