//! Version-specific resource implementations.
//!
//! Resources are organized by API version:
//!
//! ```text
//! resources/
//!   mod.rs           <- This file (re-exports the current version)
//!   v1/
//!     mod.rs         <- Version-specific resources
//! ```
//!
//! The current version is re-exported at this module level for convenience:
//!
//! ```rust,ignore
//! use valence_client::rest::resources::Node;       // current version
//! use valence_client::rest::resources::v1::Node;   // explicit version
//! ```

pub mod v1;

pub use v1::{
    CommonFields, Flavor, FlavorClient, Node, NodeClient, PodManager, PodManagersClient, System,
    SystemClient,
};
