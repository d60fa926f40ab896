//! Storage services and the remote (iSCSI) targets they expose.

use serde::Deserialize;
use serde_json::Value;

use crate::redfish::collection::{Collection, RedfishResource};
use crate::redfish::connector::{odata_link, RedfishClient};
use crate::redfish::error::RedfishError;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StorageServiceDocument {
    id: String,
    name: Option<String>,
    description: Option<String>,
}

/// A storage service.
#[derive(Clone, Debug)]
pub struct StorageService {
    client: RedfishClient,
    path: String,
    document: Value,
    fields: StorageServiceDocument,
    remote_targets: Option<Collection<RemoteTarget>>,
}

impl RedfishResource for StorageService {
    const KIND: &'static str = "StorageService";

    fn from_document(
        client: RedfishClient,
        path: String,
        document: Value,
    ) -> Result<Self, RedfishError> {
        let fields = decode_service(&path, &document)?;
        Ok(Self {
            client,
            path,
            document,
            fields,
            remote_targets: None,
        })
    }
}

fn decode_service(path: &str, document: &Value) -> Result<StorageServiceDocument, RedfishError> {
    StorageServiceDocument::deserialize(document).map_err(|source| RedfishError::Decode {
        resource: StorageService::KIND,
        path: path.to_string(),
        source,
    })
}

impl StorageService {
    /// The service's `Id`.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.fields.id
    }

    /// Path the service was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }

    /// The raw document.
    #[must_use]
    pub const fn json(&self) -> &Value {
        &self.document
    }

    /// The remote target collection, loaded from the `RemoteTargets` link on
    /// first use and kept until [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::MissingAttribute`] if the service has no
    /// `RemoteTargets` link, or [`RedfishError`] if the request fails.
    pub async fn remote_targets(&mut self) -> Result<Collection<RemoteTarget>, RedfishError> {
        if let Some(targets) = &self.remote_targets {
            return Ok(targets.clone());
        }

        let path = odata_link(&self.document, "RemoteTargets").ok_or_else(|| {
            RedfishError::MissingAttribute {
                attribute: "RemoteTargets".to_string(),
                resource: self.path.clone(),
            }
        })?;
        let targets = Collection::load(self.client.clone(), &path).await?;
        self.remote_targets = Some(targets.clone());
        Ok(targets)
    }

    /// Reloads the service document and drops the cached target collection.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the request fails.
    pub async fn refresh(&mut self) -> Result<(), RedfishError> {
        let document = self.client.get(&self.path).await?;
        self.fields = decode_service(&self.path, &document)?;
        self.document = document;
        self.remote_targets = None;
        Ok(())
    }
}

/// A remote storage target.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteTarget {
    #[serde(skip)]
    path: String,
    #[serde(rename = "Id")]
    pub identity: String,
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub target_type: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Value>,
}

impl RemoteTarget {
    /// Path the target was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The `iSCSI` address objects, in document order.
    pub fn iscsi_addresses(&self) -> impl Iterator<Item = &Value> {
        self.addresses.iter().filter_map(|address| address.get("iSCSI"))
    }
}

impl RedfishResource for RemoteTarget {
    const KIND: &'static str = "RemoteTarget";

    fn from_document(
        _client: RedfishClient,
        path: String,
        document: Value,
    ) -> Result<Self, RedfishError> {
        let mut target: Self =
            serde_json::from_value(document).map_err(|source| RedfishError::Decode {
                resource: Self::KIND,
                path: path.clone(),
                source,
            })?;
        target.path = path;
        Ok(target)
    }
}
