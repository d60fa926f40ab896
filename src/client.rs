//! The top-level Valence client.

use std::sync::Arc;

use crate::clients::{HttpClient, HttpError};
use crate::config::ValenceConfig;
use crate::rest::resources::{FlavorClient, NodeClient, PodManagersClient, SystemClient};

/// Entry point to the Valence API.
///
/// One `Client` owns one transport; the four resource clients share it.
///
/// # Example
///
/// ```rust,ignore
/// use valence_client::{BaseUrl, Client, ValenceConfig};
///
/// let config = ValenceConfig::builder()
///     .base_url(BaseUrl::new("http://valence.local:8181")?)
///     .build()?;
/// let client = Client::new(&config)?;
///
/// for flavor in client.flavors.list_flavors().await? {
///     println!("{flavor}");
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    /// `/v1/pod_managers`.
    pub pod_managers: PodManagersClient,
    /// `/v1/nodes`.
    pub nodes: NodeClient,
    /// `/v1/flavors`.
    pub flavors: FlavorClient,
    /// `/v1/systems`.
    pub systems: SystemClient,
    http: Arc<HttpClient>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Connection`] if the HTTP client cannot be built.
    pub fn new(config: &ValenceConfig) -> Result<Self, HttpError> {
        let http = Arc::new(HttpClient::new(config)?);
        Ok(Self {
            pod_managers: PodManagersClient::new(Arc::clone(&http)),
            nodes: NodeClient::new(Arc::clone(&http)),
            flavors: FlavorClient::new(Arc::clone(&http)),
            systems: SystemClient::new(Arc::clone(&http)),
            http,
        })
    }

    /// The shared transport.
    #[must_use]
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }
}
