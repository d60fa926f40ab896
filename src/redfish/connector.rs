//! Connection to a pod manager's Redfish service.
//!
//! The Redfish service is reached directly, with HTTP basic authentication,
//! not through the Valence transport. Documents are plain JSON; resource
//! paths are the `@odata.id` values found in other documents.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::clients::{decode_body, HttpMethod, ResponseBody, CLIENT_VERSION};
use crate::redfish::collection::{Collection, RedfishResource};
use crate::redfish::error::RedfishError;
use crate::redfish::node::Node;
use crate::redfish::storage::StorageService;

/// Root path used when the service URL carries no path of its own.
pub const DEFAULT_ROOT_PATH: &str = "/redfish/v1";

/// Default per-request timeout.
pub const DEFAULT_REDFISH_TIMEOUT: Duration = Duration::from_secs(60);

struct Connector {
    client: reqwest::Client,
    origin: Url,
    root_path: String,
    username: String,
    password: String,
}

/// Client for a Redfish service.
///
/// Cloning is cheap: clones share the connection pool and credentials, and
/// every resource loaded through the client keeps a clone for follow-up
/// requests.
///
/// # Example
///
/// ```rust,ignore
/// use valence_client::redfish::{RedfishClient, ResetType};
///
/// let redfish = RedfishClient::new("https://podm.local:8443", "admin", "secret")?;
/// let nodes = redfish.get_node_collection().await?;
/// for mut node in nodes.get_members().await? {
///     println!("{} {:?}", node.identity(), node.power_state());
///     node.reset(ResetType::GracefulRestart).await?;
/// }
/// ```
#[derive(Clone)]
pub struct RedfishClient {
    inner: Arc<Connector>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RedfishClient>();
};

impl fmt::Debug for RedfishClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedfishClient")
            .field("origin", &self.inner.origin.as_str())
            .field("root_path", &self.inner.root_path)
            .field("username", &self.inner.username)
            .finish_non_exhaustive()
    }
}

impl RedfishClient {
    /// Creates a client for the service at `url` with the default timeout.
    ///
    /// A URL without a path (or with `/`) is rooted at `/redfish/v1`.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::InvalidUrl`] if `url` is not an absolute
    /// `http`/`https` URL, or [`RedfishError::Connection`] if the HTTP
    /// client cannot be built.
    pub fn new(
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, RedfishError> {
        Self::with_timeout(url, username, password, DEFAULT_REDFISH_TIMEOUT)
    }

    /// Creates a client with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// See [`RedfishClient::new`].
    pub fn with_timeout(
        url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RedfishError> {
        let parsed = Url::parse(url).map_err(|e| RedfishError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(RedfishError::InvalidUrl {
                url: url.to_string(),
                reason: "expected an http or https URL with a host".to_string(),
            });
        }

        let root_path = match parsed.path().trim_end_matches('/') {
            "" => DEFAULT_ROOT_PATH.to_string(),
            path => path.to_string(),
        };
        let mut origin = parsed.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .user_agent(format!("Valence Client Library v{CLIENT_VERSION}"))
            .build()
            .map_err(|source| RedfishError::Connection {
                url: url.to_string(),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(Connector {
                client,
                origin,
                root_path,
                username: username.into(),
                password: password.into(),
            }),
        })
    }

    /// Path of the service root document.
    #[must_use]
    pub fn root_path(&self) -> &str {
        &self.inner.root_path
    }

    /// Reads the service root.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the request fails.
    pub async fn service_root(&self) -> Result<Value, RedfishError> {
        self.get(&self.inner.root_path).await
    }

    /// Loads the composed node collection linked from `Nodes` in the
    /// service root.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::MissingAttribute`] if the service root has no
    /// `Nodes` link, or [`RedfishError`] if a request fails.
    pub async fn get_node_collection(&self) -> Result<Collection<Node>, RedfishError> {
        let path = self.root_link("Nodes").await?;
        Collection::load(self.clone(), &path).await
    }

    /// Loads one composed node.
    ///
    /// `identity` is either the node's full path (`/redfish/v1/Nodes/1`) or
    /// its `Id`, which is resolved against the node collection.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the node cannot be loaded.
    pub async fn get_node(&self, identity: &str) -> Result<Node, RedfishError> {
        let path = self.resolve(identity, "Nodes").await?;
        self.load(&path).await
    }

    /// Loads the storage service collection linked from `Services` in the
    /// service root.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::MissingAttribute`] if the service root has no
    /// `Services` link, or [`RedfishError`] if a request fails.
    pub async fn get_storage_service_collection(
        &self,
    ) -> Result<Collection<StorageService>, RedfishError> {
        let path = self.root_link("Services").await?;
        Collection::load(self.clone(), &path).await
    }

    /// Loads one storage service, by full path or by `Id`.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the service cannot be loaded.
    pub async fn get_storage_service(&self, identity: &str) -> Result<StorageService, RedfishError> {
        let path = self.resolve(identity, "Services").await?;
        self.load(&path).await
    }

    pub(crate) async fn load<T: RedfishResource>(&self, path: &str) -> Result<T, RedfishError> {
        let document = self.get(path).await?;
        T::from_document(self.clone(), path.to_string(), document)
    }

    async fn root_link(&self, attribute: &str) -> Result<String, RedfishError> {
        let root = self.service_root().await?;
        odata_link(&root, attribute).ok_or_else(|| RedfishError::MissingAttribute {
            attribute: format!("{attribute}/@odata.id"),
            resource: self.inner.root_path.clone(),
        })
    }

    async fn resolve(&self, identity: &str, collection: &str) -> Result<String, RedfishError> {
        if identity.starts_with('/') {
            return Ok(identity.to_string());
        }
        let base = self.root_link(collection).await?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            urlencoding::encode(identity)
        ))
    }

    pub(crate) async fn get(&self, path: &str) -> Result<Value, RedfishError> {
        self.send(HttpMethod::Get, path, None).await
    }

    pub(crate) async fn post(&self, path: &str, body: &Value) -> Result<Value, RedfishError> {
        self.send(HttpMethod::Post, path, Some(body)).await
    }

    pub(crate) async fn patch(&self, path: &str, body: &Value) -> Result<Value, RedfishError> {
        self.send(HttpMethod::Patch, path, Some(body)).await
    }

    fn url(&self, path: &str) -> Result<Url, RedfishError> {
        self.inner
            .origin
            .join(path)
            .map_err(|e| RedfishError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, RedfishError> {
        let url = self.url(path)?;
        tracing::debug!(%method, %url, "Redfish request");

        let mut request = self
            .inner
            .client
            .request(method.into(), url.clone())
            .basic_auth(&self.inner.username, Some(&self.inner.password))
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let connection_error = |source| RedfishError::Connection {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(connection_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(connection_error)?;
        tracing::debug!(status, %url, "Redfish response");

        let decoded = decode_body(status, content_type.as_deref(), &text);
        if status >= 400 {
            return Err(RedfishError::Http {
                method,
                url: url.to_string(),
                status,
                message: error_message(&decoded, &text),
            });
        }

        match decoded {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Empty | ResponseBody::Text(_) => Ok(Value::Null),
        }
    }
}

/// Reads `document[attribute]["@odata.id"]`.
pub(crate) fn odata_link(document: &Value, attribute: &str) -> Option<String> {
    document
        .get(attribute)?
        .get("@odata.id")?
        .as_str()
        .map(str::to_string)
}

/// Extracts `error.message` from a Redfish error document, else the body.
fn error_message(decoded: &ResponseBody, text: &str) -> String {
    decoded
        .as_json()
        .and_then(|json| json.get("error"))
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| text.trim().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_host_is_rooted_at_redfish_v1() {
        let client = RedfishClient::new("https://podm.local:8443", "admin", "pw").unwrap();
        assert_eq!(client.root_path(), "/redfish/v1");
    }

    #[test]
    fn test_explicit_root_path_is_kept_without_trailing_slash() {
        let client = RedfishClient::new("http://podm.local/redfish/v1/", "admin", "pw").unwrap();
        assert_eq!(client.root_path(), "/redfish/v1");
    }

    #[test]
    fn test_non_http_url_is_rejected() {
        let result = RedfishClient::new("ftp://podm.local", "admin", "pw");
        assert!(matches!(result, Err(RedfishError::InvalidUrl { .. })));

        let result = RedfishClient::new("podm.local", "admin", "pw");
        assert!(matches!(result, Err(RedfishError::InvalidUrl { .. })));
    }

    #[test]
    fn test_paths_join_onto_origin() {
        let client = RedfishClient::new("https://podm.local:8443/redfish/v1", "a", "b").unwrap();
        let url = client.url("/redfish/v1/Nodes/1").unwrap();
        assert_eq!(url.as_str(), "https://podm.local:8443/redfish/v1/Nodes/1");
    }

    #[test]
    fn test_debug_omits_password() {
        let client = RedfishClient::new("https://podm.local", "admin", "hunter2").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_odata_link() {
        let root = json!({
            "Nodes": {"@odata.id": "/redfish/v1/Nodes"},
            "Services": {}
        });
        assert_eq!(odata_link(&root, "Nodes").as_deref(), Some("/redfish/v1/Nodes"));
        assert_eq!(odata_link(&root, "Services"), None);
        assert_eq!(odata_link(&root, "Systems"), None);
    }

    #[test]
    fn test_error_message_prefers_redfish_error_document() {
        let body = json!({"error": {"code": "Base.1.0.GeneralError", "message": "node busy"}});
        let decoded = ResponseBody::Json(body.clone());
        assert_eq!(error_message(&decoded, &body.to_string()), "node busy");

        let decoded = ResponseBody::Text("gateway down\n".to_string());
        assert_eq!(error_message(&decoded, "gateway down\n"), "gateway down");
    }
}
