//! Direct access to a pod manager's Redfish service.
//!
//! The Valence API composes nodes; the pod manager behind it exposes the
//! composed nodes, their processors and its storage services over Redfish.
//! This module talks to that service directly, with HTTP basic
//! authentication, for the operations Valence does not proxy: power control,
//! boot source overrides and assembly.
//!
//! # Example
//!
//! ```rust,ignore
//! use valence_client::redfish::{BootSourceEnabled, BootSourceTarget, RedfishClient};
//!
//! let redfish = RedfishClient::new("https://podm.local:8443", "admin", "secret")?;
//! let mut node = redfish.get_node("1").await?;
//!
//! node.set_boot_source(BootSourceTarget::Pxe, BootSourceEnabled::Once, None).await?;
//! node.assemble().await?;
//!
//! for processor in node.processors().await?.get_members().await? {
//!     println!("{} {:?}", processor.identity, processor.model);
//! }
//! ```

mod collection;
mod connector;
mod error;
mod node;
mod processor;
mod storage;
mod types;

pub use collection::{Collection, RedfishResource};
pub use connector::{RedfishClient, DEFAULT_REDFISH_TIMEOUT, DEFAULT_ROOT_PATH};
pub use error::RedfishError;
pub use node::{Boot, MemorySummary, Node};
pub use processor::{Processor, Status};
pub use storage::{RemoteTarget, StorageService};
pub use types::{
    BootSourceEnabled, BootSourceMode, BootSourceTarget, ComposedNodeState, PowerState, ResetType,
};
