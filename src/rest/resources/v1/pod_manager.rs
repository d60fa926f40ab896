//! Pod manager resource.
//!
//! A pod manager is a registered out-of-band hardware controller endpoint
//! that Valence aggregates.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let request = json!({
//!     "name": "podm-1",
//!     "url": "https://10.0.0.2:8443",
//!     "driver": "redfishv1",
//!     "authentication": [{"type": "basic", "auth_items": {"username": "admin", "password": "pw"}}],
//! });
//! let podm = client.pod_managers.create_podmanager(request.as_object().unwrap().clone()).await?;
//! println!("registered {}", podm.uuid().unwrap_or_default());
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{HttpClient, HttpMethod};
use crate::rest::{Manager, ResourceError};

valence_resource!(
    /// A registered pod manager.
    PodManager,
    collection = "pod_managers",
    creation = ["name", "url", "driver", "authentication"]
);

impl PodManager {
    /// The management endpoint URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    /// The driver used to talk to the pod manager.
    #[must_use]
    pub fn driver(&self) -> Option<&str> {
        self.get_str("driver")
    }

    /// The reported status (e.g., "Online").
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.get_str("status")
    }
}

/// Client for `/v1/pod_managers`.
#[derive(Clone, Debug)]
pub struct PodManagersClient {
    manager: Manager<PodManager>,
}

impl PodManagersClient {
    /// Creates a client sharing the given transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self {
            manager: Manager::new(http),
        }
    }

    /// Returns the generic manager.
    #[must_use]
    pub const fn manager(&self) -> &Manager<PodManager> {
        &self.manager
    }

    /// Lists all pod managers.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn list_podmanagers(&self) -> Result<Vec<PodManager>, ResourceError> {
        self.manager.list(&[]).await
    }

    /// Registers a pod manager.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] for keys other than
    /// `name`, `url`, `driver` and `authentication`, or [`ResourceError`] if
    /// the request fails.
    pub async fn create_podmanager(
        &self,
        request: Map<String, Value>,
    ) -> Result<PodManager, ResourceError> {
        self.manager.create(request).await
    }

    /// Removes a pod manager.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn delete_podmanager(&self, podm_id: &str) -> Result<(), ResourceError> {
        self.manager.delete(podm_id).await
    }

    /// Shows one pod manager.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn show_podmanager(&self, podm_id: &str) -> Result<Option<PodManager>, ResourceError> {
        self.manager.get(podm_id, None).await
    }

    /// Updates a pod manager with PATCH.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn update_podmanager(
        &self,
        podm_id: &str,
        request: &Value,
    ) -> Result<Option<PodManager>, ResourceError> {
        self.manager
            .update(podm_id, request, Some(HttpMethod::Patch))
            .await
    }
}
