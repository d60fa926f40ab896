//! Processors of a composed node.

use serde::Deserialize;
use serde_json::Value;

use crate::redfish::collection::RedfishResource;
use crate::redfish::connector::RedfishClient;
use crate::redfish::error::RedfishError;

/// `Status` block shared by Redfish resources.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Status {
    pub state: Option<String>,
    pub health: Option<String>,
}

/// A processor.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Processor {
    #[serde(skip)]
    path: String,
    /// The processor's `Id`.
    #[serde(rename = "Id")]
    pub identity: String,
    pub name: Option<String>,
    pub socket: Option<String>,
    pub processor_type: Option<String>,
    pub processor_architecture: Option<String>,
    pub instruction_set: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "MaxSpeedMHz")]
    pub max_speed_mhz: Option<u64>,
    pub total_cores: Option<u64>,
    pub total_threads: Option<u64>,
    #[serde(default)]
    pub status: Status,
}

impl Processor {
    /// Path the processor was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl RedfishResource for Processor {
    const KIND: &'static str = "Processor";

    fn from_document(
        _client: RedfishClient,
        path: String,
        document: Value,
    ) -> Result<Self, RedfishError> {
        let mut processor: Self =
            serde_json::from_value(document).map_err(|source| RedfishError::Decode {
                resource: Self::KIND,
                path: path.clone(),
                source,
            })?;
        processor.path = path;
        Ok(processor)
    }
}
