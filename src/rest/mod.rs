//! Resource infrastructure for the Valence API.
//!
//! This module provides the generic layer every Valence resource is built on:
//!
//! - **[`Resource`]**: An ordered attribute bag with a one-time lazy fetch
//! - **[`ValenceResource`] trait**: Binds a typed wrapper to a collection and
//!   a creation allow-list
//! - **[`Manager<R>`]**: list/get/create/update/delete/manage/find over one collection
//! - **Path building**: [`collection_path`] and [`build_query`]
//! - **[`ResourceError`]**: Semantic error types for resource operations
//!
//! # Example: Using a Manager
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use valence_client::clients::HttpClient;
//! use valence_client::rest::Manager;
//! use valence_client::rest::resources::v1::Flavor;
//!
//! let http = Arc::new(HttpClient::new(&config)?);
//! let flavors: Manager<Flavor> = Manager::new(http);
//!
//! // List
//! for flavor in flavors.list(&[]).await? {
//!     println!("{flavor}");
//! }
//!
//! // Create (keys outside the allow-list are rejected before any I/O)
//! let attrs = json!({"name": "small", "properties": {"memory": {"capacity_mib": "4096"}}});
//! let flavor = flavors.create(attrs.as_object().unwrap().clone()).await?;
//!
//! // Find exactly one
//! let small = flavors.find(&[("name", "small")]).await?;
//! ```
//!
//! # Key Types
//!
//! - [`ResourceError`]: Error types for resource operations
//! - [`ResourceOperation`]: The operations a manager performs
//! - [`resources`]: Version-specific resource implementations

mod errors;
mod manager;
mod path;
mod resource;

pub mod resources;

pub use errors::ResourceError;
pub use manager::{Filters, Manager};
pub use path::{build_query, collection_path, ResourceOperation};
pub use resource::{Resource, ValenceResource};
