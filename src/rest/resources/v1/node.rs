//! Composed node resource.
//!
//! A composed node is a logical machine assembled from pooled hardware. Nodes
//! are composed from a flavor or from explicit properties, and an existing
//! node known to a pod manager can be brought under management with
//! [`NodeClient::manage_node`].

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::clients::{HttpClient, HttpMethod};
use crate::rest::{Manager, ResourceError};

valence_resource!(
    /// A composed node.
    Node,
    collection = "nodes",
    creation = ["name", "podm_id", "flavor_id", "properties"]
);

impl Node {
    /// The node's index on its pod manager.
    #[must_use]
    pub fn index(&self) -> Option<String> {
        match self.get("index")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The Redfish URI of the node on its pod manager.
    #[must_use]
    pub fn resource_uri(&self) -> Option<&str> {
        self.get_str("resource_uri")
    }

    /// The pod manager the node belongs to.
    #[must_use]
    pub fn podm_id(&self) -> Option<&str> {
        self.get_str("podm_id")
    }
}

/// Client for `/v1/nodes`.
#[derive(Clone, Debug)]
pub struct NodeClient {
    manager: Manager<Node>,
}

impl NodeClient {
    /// Creates a client sharing the given transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self {
            manager: Manager::new(http),
        }
    }

    /// Returns the generic manager.
    #[must_use]
    pub const fn manager(&self) -> &Manager<Node> {
        &self.manager
    }

    /// Lists composed nodes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn list_nodes(&self) -> Result<Vec<Node>, ResourceError> {
        self.manager.list(&[]).await
    }

    /// Composes a node.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidAttribute`] for keys other than
    /// `name`, `podm_id`, `flavor_id` and `properties`, or
    /// [`ResourceError`] if the request fails.
    pub async fn compose_node(&self, request: Map<String, Value>) -> Result<Node, ResourceError> {
        self.manager.create(request).await
    }

    /// Deletes (disassembles) a node.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn delete_node(&self, node_id: &str) -> Result<(), ResourceError> {
        self.manager.delete(node_id).await
    }

    /// Shows one node.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn show_node(&self, node_id: &str) -> Result<Option<Node>, ResourceError> {
        self.manager.get(node_id, None).await
    }

    /// Brings an already-composed node under Valence management.
    ///
    /// Sends `{"node_index": ..., "podm_id": ...}` to `/v1/nodes/manage`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or returns no node.
    pub async fn manage_node(&self, node_index: &str, podm_id: &str) -> Result<Node, ResourceError> {
        let request = json!({ "node_index": node_index, "podm_id": podm_id });
        self.manager.manage("/manage", &request).await
    }

    /// Updates a node with PATCH.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn update_node(
        &self,
        node_id: &str,
        request: &Value,
    ) -> Result<Option<Node>, ResourceError> {
        self.manager
            .update(node_id, request, Some(HttpMethod::Patch))
            .await
    }
}
