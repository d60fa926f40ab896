//! The attribute bag every manager returns.
//!
//! A [`Resource`] is an ordered JSON mapping decoded from one server object,
//! plus a `loaded` flag. A resource that is not loaded can fetch its full
//! representation once, through [`Resource::get_or_fetch`]; after that one
//! attempt it is marked loaded whatever the outcome.
//!
//! Concrete resource types ([`Node`](crate::rest::resources::v1::Node) and
//! friends) wrap a `Resource` and implement [`ValenceResource`], which binds
//! them to a collection and a creation allow-list.

use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

use crate::clients::{HttpClient, HttpMethod};
use crate::rest::errors::ResourceError;
use crate::rest::path::collection_path;

/// A resource type served by one Valence collection.
///
/// Implementors are thin typed wrappers around [`Resource`].
///
/// # Example
///
/// ```rust
/// use valence_client::rest::{Resource, ValenceResource};
///
/// struct Chassis(Resource);
///
/// impl From<Resource> for Chassis {
///     fn from(resource: Resource) -> Self {
///         Self(resource)
///     }
/// }
///
/// impl AsRef<Resource> for Chassis {
///     fn as_ref(&self) -> &Resource {
///         &self.0
///     }
/// }
///
/// impl ValenceResource for Chassis {
///     const NAME: &'static str = "Chassis";
///     const COLLECTION: &'static str = "chassis";
///     const CREATION_ATTRIBUTES: &'static [&'static str] = &["name"];
/// }
/// ```
pub trait ValenceResource: From<Resource> + AsRef<Resource> + Send + Sync {
    /// The type name used in messages and `Display` output (e.g., "Node").
    const NAME: &'static str;

    /// The collection path segment under `/v1` (e.g., "nodes").
    const COLLECTION: &'static str;

    /// Attribute names accepted by `create`.
    const CREATION_ATTRIBUTES: &'static [&'static str];
}

/// One server-side entity snapshot.
///
/// Attributes keep the order the server sent them in. The only mutation is
/// the one-time lazy fetch.
#[derive(Clone)]
pub struct Resource {
    kind: &'static str,
    collection: &'static str,
    attributes: Map<String, Value>,
    loaded: bool,
    origin: Option<Weak<HttpClient>>,
}

impl Resource {
    /// Creates a resource with no link back to a transport.
    ///
    /// Such a resource never fetches; [`get_or_fetch`](Self::get_or_fetch)
    /// only reads local attributes.
    #[must_use]
    pub fn new(
        kind: &'static str,
        collection: &'static str,
        attributes: Map<String, Value>,
        loaded: bool,
    ) -> Self {
        Self {
            kind,
            collection,
            attributes,
            loaded,
            origin: None,
        }
    }

    /// Links the resource to the transport that produced it.
    ///
    /// Only a weak reference is kept; the resource does not keep the client
    /// alive.
    #[must_use]
    pub(crate) fn with_origin(mut self, http: &Arc<HttpClient>) -> Self {
        self.origin = Some(Arc::downgrade(http));
        self
    }

    /// Returns the type name (e.g., "Node").
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Returns the collection path segment (e.g., "nodes").
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.collection
    }

    /// Returns the identifier: `uuid`, then `id` (string or number).
    #[must_use]
    pub fn id(&self) -> Option<String> {
        ["uuid", "id"]
            .iter()
            .filter_map(|key| self.attributes.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// Returns an attribute, without fetching.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Returns a string attribute.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns an integer attribute.
    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Returns a boolean attribute.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Returns a nested object attribute.
    #[must_use]
    pub fn get_object(&self, field: &str) -> Option<&Map<String, Value>> {
        self.get(field).and_then(Value::as_object)
    }

    /// Returns all attributes.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns a deep copy of the attributes.
    #[must_use]
    pub fn to_dict(&self) -> Map<String, Value> {
        self.attributes.clone()
    }

    /// Consumes the resource, returning its attributes.
    #[must_use]
    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// Returns `true` once the full representation is present (or was tried).
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns an attribute, fetching the full representation first if the
    /// attribute is missing and the resource is not loaded.
    ///
    /// At most one fetch is ever made: the resource is marked loaded before
    /// the request goes out, so a failed fetch is not repeated. Fetched
    /// attributes are merged over the local ones.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the fetch fails.
    pub async fn get_or_fetch(&mut self, field: &str) -> Result<Option<&Value>, ResourceError> {
        if self.loaded || self.attributes.contains_key(field) {
            return Ok(self.attributes.get(field));
        }

        self.loaded = true;
        self.fetch().await?;
        Ok(self.attributes.get(field))
    }

    async fn fetch(&mut self) -> Result<(), ResourceError> {
        let Some(http) = self.origin.as_ref().and_then(Weak::upgrade) else {
            tracing::debug!("{} has no live client to load from", self.kind);
            return Ok(());
        };
        let Some(id) = self.id() else {
            tracing::debug!("{} has no identifier to load by", self.kind);
            return Ok(());
        };

        let path = collection_path(self.collection, Some(&id));
        let response = http.json_request(HttpMethod::Get, &path, None).await?;
        let fresh = response
            .body
            .into_json()
            .map(extract_items)
            .and_then(|items| items.into_iter().next());

        if let Some(fresh) = fresh {
            self.attributes.extend(fresh);
        }
        Ok(())
    }
}

/// Normalizes a response body to a list of objects.
///
/// Unwraps a `{"values": [...]}` envelope. A single object becomes a
/// one-element list. `null`, empty objects and non-object members are
/// skipped.
pub(crate) fn extract_items(body: Value) -> Vec<Map<String, Value>> {
    let data = match body {
        Value::Object(mut map) if matches!(map.get("values"), Some(Value::Array(_))) => {
            map.remove("values").unwrap_or(Value::Null)
        }
        other => other,
    };

    let items = match data {
        Value::Array(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        })
        .collect()
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.kind, Value::Object(self.attributes.clone()))
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.attributes == other.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_id_prefers_uuid_then_id() {
        let r = Resource::new("Node", "nodes", object(json!({"id": 7, "uuid": "u-1"})), true);
        assert_eq!(r.id().as_deref(), Some("u-1"));

        let r = Resource::new("Node", "nodes", object(json!({"id": 7})), true);
        assert_eq!(r.id().as_deref(), Some("7"));

        let r = Resource::new("Node", "nodes", object(json!({"name": "n"})), true);
        assert!(r.id().is_none());
    }

    #[test]
    fn test_typed_accessors() {
        let r = Resource::new(
            "Flavor",
            "flavors",
            object(json!({"name": "small", "cores": 4, "default": true, "properties": {"memory": {}}})),
            true,
        );
        assert_eq!(r.get_str("name"), Some("small"));
        assert_eq!(r.get_i64("cores"), Some(4));
        assert_eq!(r.get_bool("default"), Some(true));
        assert!(r.get_object("properties").is_some());
        assert!(r.get_str("cores").is_none());
    }

    #[test]
    fn test_display_and_to_dict_preserve_order() {
        let r = Resource::new("PodManager", "pod_managers", object(json!({"uuid": "abc", "name": "pm1"})), true);
        assert_eq!(r.to_string(), r#"<PodManager {"uuid":"abc","name":"pm1"}>"#);
        assert_eq!(format!("{r:?}"), r.to_string());

        let mut copy = r.to_dict();
        copy.insert("name".to_string(), json!("changed"));
        assert_eq!(r.get_str("name"), Some("pm1"));
    }

    #[tokio::test]
    async fn test_loaded_resource_never_fetches() {
        let mut r = Resource::new("Node", "nodes", object(json!({"uuid": "n1"})), true);
        let value = r.get_or_fetch("power_state").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_unlinked_resource_marks_loaded_after_one_attempt() {
        let mut r = Resource::new("Node", "nodes", object(json!({"uuid": "n1"})), false);
        assert!(r.get_or_fetch("name").await.unwrap().is_none());
        assert!(r.is_loaded());
    }

    #[tokio::test]
    async fn test_present_attribute_does_not_mark_loaded() {
        let mut r = Resource::new("Node", "nodes", object(json!({"uuid": "n1"})), false);
        assert_eq!(r.get_or_fetch("uuid").await.unwrap(), Some(&json!("n1")));
        assert!(!r.is_loaded());
    }

    #[test]
    fn test_extract_items_normalizes_envelopes() {
        let plain = extract_items(json!([{"uuid": "a"}, {"uuid": "b"}]));
        let wrapped = extract_items(json!({"values": [{"uuid": "a"}, {"uuid": "b"}]}));
        assert_eq!(plain, wrapped);
        assert_eq!(plain.len(), 2);

        let single = extract_items(json!({"uuid": "a"}));
        assert_eq!(single.len(), 1);

        assert!(extract_items(json!([])).is_empty());
        assert!(extract_items(json!({"values": []})).is_empty());
    }

    #[test]
    fn test_extract_items_skips_null_empty_and_scalars() {
        let items = extract_items(json!([null, {}, 3, "x", {"uuid": "a"}]));
        assert_eq!(items.len(), 1);
        assert!(extract_items(Value::Null).is_empty());
    }
}
