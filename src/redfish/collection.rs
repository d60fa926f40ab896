//! Redfish collections and the trait their members implement.

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::redfish::connector::RedfishClient;
use crate::redfish::error::RedfishError;

/// A Redfish resource that can be built from a document.
pub trait RedfishResource: Sized {
    /// Resource kind used in diagnostics.
    const KIND: &'static str;

    /// Builds the resource from the document loaded at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError::Decode`] if the document does not have the
    /// expected shape.
    fn from_document(
        client: RedfishClient,
        path: String,
        document: Value,
    ) -> Result<Self, RedfishError>;
}

/// A collection document: the member paths plus the client to load them.
pub struct Collection<T> {
    client: RedfishClient,
    path: String,
    name: Option<String>,
    members: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            path: self.path.clone(),
            name: self.name.clone(),
            members: self.members.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

impl<T: RedfishResource> Collection<T> {
    /// Loads the collection document at `path`.
    pub(crate) async fn load(client: RedfishClient, path: &str) -> Result<Self, RedfishError> {
        let document = client.get(path).await?;
        Ok(Self::from_parts(client, path.to_string(), &document))
    }

    fn from_parts(client: RedfishClient, path: String, document: &Value) -> Self {
        let members = document
            .get("Members")
            .and_then(Value::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|member| member.get("@odata.id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let name = document
            .get("Name")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            client,
            path,
            name,
            members,
            _marker: PhantomData,
        }
    }

    /// Path of the collection document.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The collection's `Name`, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Member paths, in document order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Loads the member at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the member cannot be loaded.
    pub async fn get_member(&self, path: &str) -> Result<T, RedfishError> {
        self.client.load(path).await
    }

    /// Loads every member, in document order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RedfishError`] encountered.
    pub async fn get_members(&self) -> Result<Vec<T>, RedfishError> {
        let mut loaded = Vec::with_capacity(self.members.len());
        for path in &self.members {
            loaded.push(self.client.load(path).await?);
        }
        Ok(loaded)
    }

    /// Reloads the collection document.
    ///
    /// # Errors
    ///
    /// Returns [`RedfishError`] if the request fails.
    pub async fn refresh(&mut self) -> Result<(), RedfishError> {
        let document = self.client.get(&self.path).await?;
        *self = Self::from_parts(self.client.clone(), self.path.clone(), &document);
        Ok(())
    }
}
