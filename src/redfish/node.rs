//! Composed nodes as seen through Redfish.
//!
//! A [`Node`] wraps the `ComposedNode` document and exposes the power and
//! boot controls the pod manager offers for it. Values sent to the service
//! are checked against the allowable values the node advertises; when a node
//! advertises none, every known value is accepted and a warning is logged.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::redfish::collection::{Collection, RedfishResource};
use crate::redfish::connector::{odata_link, RedfishClient};
use crate::redfish::error::RedfishError;
use crate::redfish::processor::Processor;
use crate::redfish::types::{
    join_values, BootSourceEnabled, BootSourceMode, BootSourceTarget, ComposedNodeState,
    PowerState, ResetType,
};

const RESET_ACTION: &str = "#ComposedNode.Reset";
const ASSEMBLE_ACTION: &str = "#ComposedNode.Assemble";

/// Boot override settings of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Boot {
    /// Raw allowable targets advertised by the service.
    #[serde(rename = "BootSourceOverrideTarget@Redfish.AllowableValues")]
    pub allowed_values: Option<Vec<String>>,
    /// Override persistence (`Once`, `Continuous`, `Disabled`).
    #[serde(rename = "BootSourceOverrideEnabled")]
    pub enabled: Option<String>,
    /// Boot mode (`Legacy`, `UEFI`).
    #[serde(rename = "BootSourceOverrideMode")]
    pub mode: Option<String>,
    /// Current override target.
    #[serde(rename = "BootSourceOverrideTarget")]
    pub target: Option<String>,
}

/// Summary of the node's memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySummary {
    /// `Status.Health`.
    pub health: Option<String>,
    /// `TotalSystemMemoryGiB`.
    pub size_gib: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
struct ActionElement {
    target: Option<String>,
    #[serde(rename = "ResetType@Redfish.AllowableValues")]
    allowed_values: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NodeDocument {
    id: String,
    name: Option<String>,
    description: Option<String>,
    #[serde(rename = "UUID")]
    uuid: Option<String>,
    power_state: Option<Value>,
    composed_node_state: Option<Value>,
    #[serde(default)]
    boot: Boot,
    memory: Option<Value>,
    #[serde(default)]
    actions: Map<String, Value>,
}

/// A composed node.
#[derive(Clone, Debug)]
pub struct Node {
    client: RedfishClient,
    path: String,
    document: Value,
    fields: NodeDocument,
    processors: Option<Collection<Processor>>,
}

impl RedfishResource for Node {
    const KIND: &'static str = "ComposedNode";

    fn from_document(
        client: RedfishClient,
        path: String,
        document: Value,
    ) -> Result<Self, RedfishError> {
        let fields = decode(&path, &document)?;
        Ok(Self {
            client,
            path,
            document,
            fields,
            processors: None,
        })
    }
}

fn decode(path: &str, document: &Value) -> Result<NodeDocument, RedfishError> {
    NodeDocument::deserialize(document).map_err(|source| RedfishError::Decode {
        resource: Node::KIND,
        path: path.to_string(),
        source,
    })
}

/// Maps the advertised wire values onto known values, or every known value
/// when nothing is advertised.
fn allowed<T>(advertised: Option<&[String]>, all: &[T], what: &str, identity: &str) -> Vec<T>
where
    T: Copy + std::str::FromStr,
{
    match advertised {
        Some(values) if !values.is_empty() => {
            values.iter().filter_map(|v| v.parse().ok()).collect()
        }
        _ => {
            tracing::warn!(
                "Could not figure out the allowed values for {} for Node {}",
                what,
                identity
            );
            all.to_vec()
        }
    }
}

impl Node {
    /// The node's `Id`.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.fields.id
    }

    /// Path the node was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw document.
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.document
    }

    /// The node's `Name`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    /// The node's `Description`.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }

    /// The node's `UUID`.
    #[must_use]
    pub fn uuid(&self) -> Option<&str> {
        self.fields.uuid.as_deref()
    }

    /// The power state, if reported with a known value.
    #[must_use]
    pub fn power_state(&self) -> Option<PowerState> {
        self.fields.power_state.as_ref()?.as_str()?.parse().ok()
    }

    /// The composition state, if reported with a known value.
    #[must_use]
    pub fn composed_node_state(&self) -> Option<ComposedNodeState> {
        self.fields.composed_node_state.as_ref()?.as_str()?.parse().ok()
    }

    /// The boot override settings.
    #[must_use]
    pub const fn boot(&self) -> &Boot {
        &self.fields.boot
    }

    /// The memory summary, if reported.
    #[must_use]
    pub fn memory_summary(&self) -> Option<MemorySummary> {
        let memory = self.fields.memory.as_ref()?;
        Some(MemorySummary {
            health: memory
                .pointer("/Status/Health")
                .and_then(Value::as_str)
                .map(str::to_string),
            size_gib: memory.get("TotalSystemMemoryGiB").and_then(Value::as_f64),
        })
    }

    fn action(&self, name: &str) -> Result<ActionElement, RedfishError> {
        let missing = || RedfishError::MissingAction {
            action: name.to_string(),
            resource: self.path.clone(),
        };
        let element = self.fields.actions.get(name).ok_or_else(missing)?;
        let element =
            ActionElement::deserialize(element).map_err(|source| RedfishError::Decode {
                resource: Self::KIND,
                path: self.path.clone(),
                source,
            })?;
        if element.target.is_none() {
            return Err(missing());
        }
        Ok(element)
    }

    /// Reset values the node accepts.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::MissingAction`] if the node has no
    /// `#ComposedNode.Reset` action.
    pub fn allowed_reset_values(&self) -> Result<Vec<ResetType>, RedfishError> {
        let action = self.action(RESET_ACTION)?;
        Ok(allowed(
            action.allowed_values.as_deref(),
            ResetType::ALL,
            "the reset node action",
            self.identity(),
        ))
    }

    /// Resets the node.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::InvalidParameterValue`] if `value` is not
    /// allowed, [`RedfishError::MissingAction`] if the node cannot be reset,
    /// or [`RedfishError`] if the request fails.
    pub async fn reset(&self, value: ResetType) -> Result<(), RedfishError> {
        let valid = self.allowed_reset_values()?;
        if !valid.contains(&value) {
            return Err(RedfishError::InvalidParameterValue {
                parameter: "value",
                value: value.to_string(),
                valid_values: join_values(&valid),
            });
        }

        let target = self.action(RESET_ACTION)?.target.unwrap_or_default();
        self.client
            .post(&target, &json!({ "ResetType": value }))
            .await?;
        Ok(())
    }

    /// Assembles the node.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::MissingAction`] if the node has no
    /// `#ComposedNode.Assemble` action, or [`RedfishError`] if the request
    /// fails.
    pub async fn assemble(&self) -> Result<(), RedfishError> {
        let target = self.action(ASSEMBLE_ACTION)?.target.unwrap_or_default();
        self.client.post(&target, &json!({})).await?;
        Ok(())
    }

    /// Boot source targets the node accepts.
    #[must_use]
    pub fn allowed_boot_source_values(&self) -> Vec<BootSourceTarget> {
        allowed(
            self.fields.boot.allowed_values.as_deref(),
            BootSourceTarget::ALL,
            "configuring the boot source",
            self.identity(),
        )
    }

    /// Sets the boot source used on the next boot(s).
    ///
    /// Sends a `PATCH` of the node with a `Boot` object. `mode` is only sent
    /// when given.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::InvalidParameterValue`] if `target` is not
    /// allowed, or [`RedfishError`] if the request fails.
    pub async fn set_boot_source(
        &self,
        target: BootSourceTarget,
        enabled: BootSourceEnabled,
        mode: Option<BootSourceMode>,
    ) -> Result<(), RedfishError> {
        let valid = self.allowed_boot_source_values();
        if !valid.contains(&target) {
            return Err(RedfishError::InvalidParameterValue {
                parameter: "target",
                value: target.to_string(),
                valid_values: join_values(&valid),
            });
        }

        let mut boot = Map::new();
        boot.insert("BootSourceOverrideTarget".to_string(), json!(target));
        boot.insert("BootSourceOverrideEnabled".to_string(), json!(enabled));
        if let Some(mode) = mode {
            boot.insert("BootSourceOverrideMode".to_string(), json!(mode));
        }

        self.client
            .patch(&self.path, &json!({ "Boot": boot }))
            .await?;
        Ok(())
    }

    /// The node's processor collection.
    ///
    /// Loaded from the `Processors` link on first use and kept until
    /// [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::MissingAttribute`] if the node has no
    /// `Processors` link, or [`RedfishError`] if the request fails.
    pub async fn processors(&mut self) -> Result<Collection<Processor>, RedfishError> {
        if let Some(processors) = &self.processors {
            return Ok(processors.clone());
        }

        let path = odata_link(&self.document, "Processors").ok_or_else(|| {
            RedfishError::MissingAttribute {
                attribute: "Processors".to_string(),
                resource: self.path.clone(),
            }
        })?;
        let processors = Collection::load(self.client.clone(), &path).await?;
        self.processors = Some(processors.clone());
        Ok(processors)
    }

    /// Reloads the node document and drops the cached processor collection.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the request fails or the document no
    /// longer decodes.
    pub async fn refresh(&mut self) -> Result<(), RedfishError> {
        let document = self.client.get(&self.path).await?;
        self.fields = decode(&self.path, &document)?;
        self.document = document;
        self.processors = None;
        Ok(())
    }
}
