//! Flavor resource: a named template of processor, memory and storage
//! requirements used to compose nodes.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{HttpClient, HttpMethod};
use crate::rest::{Manager, ResourceError};

valence_resource!(
    /// A node composition template.
    Flavor,
    collection = "flavors",
    creation = ["name", "properties"]
);

impl Flavor {
    /// The requirement properties (`processor`, `memory`, `storage`).
    #[must_use]
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.get_object("properties")
    }
}

/// Client for `/v1/flavors`.
#[derive(Clone, Debug)]
pub struct FlavorClient {
    manager: Manager<Flavor>,
}

impl FlavorClient {
    /// Creates a client sharing the given transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self {
            manager: Manager::new(http),
        }
    }

    /// Returns the generic manager.
    #[must_use]
    pub const fn manager(&self) -> &Manager<Flavor> {
        &self.manager
    }

    /// Lists flavors.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn list_flavors(&self) -> Result<Vec<Flavor>, ResourceError> {
        self.manager.list(&[]).await
    }

    /// Creates a flavor.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] for keys other than
    /// `name` and `properties`, or [`ResourceError`] if the request fails.
    pub async fn create_flavor(&self, request: Map<String, Value>) -> Result<Flavor, ResourceError> {
        self.manager.create(request).await
    }

    /// Deletes a flavor.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn delete_flavor(&self, flavor_id: &str) -> Result<(), ResourceError> {
        self.manager.delete(flavor_id).await
    }

    /// Shows one flavor.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn show_flavor(&self, flavor_id: &str) -> Result<Option<Flavor>, ResourceError> {
        self.manager.get(flavor_id, None).await
    }

    /// Updates a flavor with PATCH.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn update_flavor(
        &self,
        flavor_id: &str,
        request: &Value,
    ) -> Result<Option<Flavor>, ResourceError> {
        self.manager
            .update(flavor_id, request, Some(HttpMethod::Patch))
            .await
    }
}
