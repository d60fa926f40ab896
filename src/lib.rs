//! # Valence Client
//!
//! A Rust client for Valence, the rack-scale composition service, and for
//! the Redfish services of the pod managers it aggregates.
//!
//! ## Overview
//!
//! This crate provides:
//! - Validated configuration via [`ValenceConfig`] and [`ValenceConfigBuilder`]
//! - A JSON-over-HTTP transport with redirect following, error classification
//!   and retry of connection failures ([`clients`])
//! - A generic resource manager with list/get/create/update/delete/manage/find
//!   ([`rest`])
//! - Typed clients for pod managers, composed nodes, flavors and systems,
//!   gathered in [`Client`]
//! - A Redfish sub-client for power, boot and assembly control ([`redfish`])
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use valence_client::{BaseUrl, ValenceConfig};
//!
//! let config = ValenceConfig::builder()
//!     .base_url(BaseUrl::new("http://valence.local:8181/v1").unwrap())
//!     .max_retries(3)
//!     .retry_interval(Duration::from_secs(1))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.base_url().to_string(), "http://valence.local:8181");
//! ```
//!
//! ## Working With Resources
//!
//! ```rust,ignore
//! use serde_json::json;
//! use valence_client::Client;
//!
//! let client = Client::new(&config)?;
//!
//! // Register a pod manager
//! let podm = client.pod_managers.create_podmanager(
//!     json!({"name": "podm-1", "url": "https://10.0.0.2:8443"})
//!         .as_object()
//!         .cloned()
//!         .unwrap_or_default(),
//! ).await?;
//!
//! // Compose a node from a flavor
//! let node = client.nodes.compose_node(
//!     json!({"name": "node-1", "flavor_id": "small", "podm_id": podm.uuid()})
//!         .as_object()
//!         .cloned()
//!         .unwrap_or_default(),
//! ).await?;
//! println!("{node}");
//! ```
//!
//! ## Errors
//!
//! - [`ConfigError`]: invalid configuration, reported by the builder
//! - [`HttpError`]: transport failures and classified error responses
//! - [`ResourceError`]: resource-level failures (invalid attributes, no
//!   unique match, empty responses), wrapping [`HttpError`]
//! - [`RedfishError`](redfish::RedfishError): Redfish sub-client failures
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Configuration and requests are checked before I/O
//! - **Thread-safe**: All clients are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod redfish;
pub mod rest;

// Re-export public types at crate root for convenience
pub use client::Client;
pub use config::{BaseUrl, ValenceConfig, ValenceConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ConnectionError, HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest,
    HttpRequestBuilder, HttpResponse, HttpResponseError, ResponseBody, ValidationError,
};

// Re-export resource types
pub use rest::resources::{
    CommonFields, Flavor, FlavorClient, Node, NodeClient, PodManager, PodManagersClient, System,
    SystemClient,
};
pub use rest::{Manager, Resource, ResourceError, ValenceResource};
