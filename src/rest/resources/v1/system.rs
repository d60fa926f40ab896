//! System resource: inventory of compute systems known to pod managers.
//!
//! Systems are read-only through this client and are usually scoped to one
//! pod manager with a `podm_id` filter.

use std::sync::Arc;

use crate::clients::HttpClient;
use crate::rest::{Filters, Manager, ResourceError};

valence_resource!(
    /// A physical or logical compute system.
    System,
    collection = "systems",
    creation = ["podm_id"]
);

impl System {
    /// The system's power state, if reported.
    #[must_use]
    pub fn power_state(&self) -> Option<&str> {
        self.get_str("power_state")
    }
}

/// Client for `/v1/systems`.
#[derive(Clone, Debug)]
pub struct SystemClient {
    manager: Manager<System>,
}

impl SystemClient {
    /// Creates a client sharing the given transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self {
            manager: Manager::new(http),
        }
    }

    /// Returns the generic manager.
    #[must_use]
    pub const fn manager(&self) -> &Manager<System> {
        &self.manager
    }

    /// Lists systems matching `filters` (e.g., `&[("podm_id", id)]`).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn list_systems(&self, filters: Filters<'_>) -> Result<Vec<System>, ResourceError> {
        self.manager.list(filters).await
    }

    /// Shows one system, with extra query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails.
    pub async fn show_system(
        &self,
        system_id: &str,
        filters: Filters<'_>,
    ) -> Result<Option<System>, ResourceError> {
        self.manager.get_with_filters(system_id, None, filters).await
    }
}
