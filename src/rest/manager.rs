//! Generic CRUD manager.
//!
//! A [`Manager<R>`] binds a [`ValenceResource`] type to its collection and
//! maps list/get/create/update/delete/manage onto transport calls. It holds
//! nothing but a shared handle to the transport.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{HttpClient, HttpMethod};
use crate::rest::errors::ResourceError;
use crate::rest::path::{build_query, collection_path, describe_filters, ResourceOperation};
use crate::rest::resource::{extract_items, Resource, ValenceResource};

/// Filter pairs appended to a request as a query string.
pub type Filters<'a> = &'a [(&'a str, &'a str)];

/// CRUD operations for one resource type.
///
/// # Example
///
/// ```rust,ignore
/// use valence_client::rest::Manager;
/// use valence_client::rest::resources::v1::Flavor;
///
/// let flavors: Manager<Flavor> = Manager::new(http.clone());
/// for flavor in flavors.list(&[]).await? {
///     println!("{flavor}");
/// }
/// ```
pub struct Manager<R> {
    http: Arc<HttpClient>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: ValenceResource> Manager<R> {
    /// Creates a manager sharing the given transport.
    #[must_use]
    pub const fn new(http: Arc<HttpClient>) -> Self {
        Self {
            http,
            _resource: PhantomData,
        }
    }

    /// Returns the shared transport.
    #[must_use]
    pub const fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Returns `/v1/{collection}` or `/v1/{collection}/{id}`.
    #[must_use]
    pub fn path(&self, id: Option<&str>) -> String {
        collection_path(R::COLLECTION, id)
    }

    fn wrap(&self, attributes: Map<String, Value>, loaded: bool) -> R {
        R::from(Resource::new(R::NAME, R::COLLECTION, attributes, loaded).with_origin(&self.http))
    }

    async fn fetch_all(&self, url: &str) -> Result<Vec<R>, ResourceError> {
        let response = self.http.json_request(HttpMethod::Get, url, None).await?;
        let items = response
            .body
            .into_json()
            .map(extract_items)
            .unwrap_or_default();
        Ok(items.into_iter().map(|item| self.wrap(item, true)).collect())
    }

    /// Lists the collection, optionally filtered.
    ///
    /// An empty collection yields an empty vector. Returned resources are
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn list(&self, filters: Filters<'_>) -> Result<Vec<R>, ResourceError> {
        let url = format!("{}{}", self.path(None), build_query(filters));
        self.fetch_all(&url).await
    }

    /// Fetches one resource, optionally restricted to `fields`.
    ///
    /// Returns `Ok(None)` when the server returns nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails (including a
    /// classified 404).
    pub async fn get(&self, id: &str, fields: Option<&[&str]>) -> Result<Option<R>, ResourceError> {
        self.get_with_filters(id, fields, &[]).await
    }

    /// Fetches one resource with extra query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn get_with_filters(
        &self,
        id: &str,
        fields: Option<&[&str]>,
        filters: Filters<'_>,
    ) -> Result<Option<R>, ResourceError> {
        let joined_fields = fields.map(|f| f.join(","));
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(filters.len() + 1);
        if let Some(joined) = joined_fields.as_deref() {
            pairs.push(("fields", joined));
        }
        pairs.extend_from_slice(filters);

        let url = format!("{}{}", self.path(Some(id)), build_query(&pairs));
        Ok(self.fetch_all(&url).await?.into_iter().next())
    }

    /// Creates a resource from `attributes`.
    ///
    /// Every key must be in the resource's creation allow-list; otherwise
    /// nothing is sent. The returned resource is not loaded.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::InvalidAttribute`] for keys outside the allow-list
    /// - [`ResourceError::EmptyResponse`] if the server returns no object
    /// - [`ResourceError::Http`] if the request fails
    pub async fn create(&self, attributes: Map<String, Value>) -> Result<R, ResourceError> {
        let invalid: Vec<String> = attributes
            .keys()
            .filter(|key| !R::CREATION_ATTRIBUTES.contains(&key.as_str()))
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Err(ResourceError::InvalidAttribute {
                resource: R::COLLECTION,
                attributes: invalid,
            });
        }

        let body = Value::Object(attributes);
        self.post_one(&self.path(None), &body, ResourceOperation::Create)
            .await
    }

    /// Updates a resource with `patch`, using PATCH unless `method` says
    /// otherwise.
    ///
    /// Returns `Ok(None)` when the server sends no body back.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn update(
        &self,
        id: &str,
        patch: &Value,
        method: Option<HttpMethod>,
    ) -> Result<Option<R>, ResourceError> {
        let method = method.unwrap_or_else(|| ResourceOperation::Update.default_http_method());
        let response = self
            .http
            .json_request(method, &self.path(Some(id)), Some(patch))
            .await?;
        Ok(self.first(response.body.into_json(), false))
    }

    /// Deletes a resource. No body is expected.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the request fails.
    pub async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        self.http
            .json_request(HttpMethod::Delete, &self.path(Some(id)), None)
            .await?;
        Ok(())
    }

    /// Invokes a collection action: POST `/v1/{collection}{suffix}`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::EmptyResponse`] if the server returns no object
    /// - [`ResourceError::Http`] if the request fails
    pub async fn manage(&self, suffix: &str, request: &Value) -> Result<R, ResourceError> {
        let url = format!("{}{}", self.path(None), suffix);
        self.post_one(&url, request, ResourceOperation::Manage).await
    }

    /// Finds exactly one resource matching `filters`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::NotFound`] if nothing matches
    /// - [`ResourceError::NoUniqueMatch`] if more than one resource matches
    /// - [`ResourceError::Http`] if the request fails
    pub async fn find(&self, filters: Filters<'_>) -> Result<R, ResourceError> {
        let mut matches = self.list(filters).await?;
        match matches.len() {
            0 => Err(ResourceError::NotFound {
                resource: R::NAME,
                filters: describe_filters(filters),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(ResourceError::NoUniqueMatch {
                resource: R::NAME,
                filters: describe_filters(filters),
            }),
        }
    }

    async fn post_one(
        &self,
        url: &str,
        body: &Value,
        operation: ResourceOperation,
    ) -> Result<R, ResourceError> {
        let response = self
            .http
            .json_request(operation.default_http_method(), url, Some(body))
            .await?;
        self.first(response.body.into_json(), false)
            .ok_or(ResourceError::EmptyResponse {
                resource: R::NAME,
                operation: operation.as_str(),
            })
    }

    fn first(&self, body: Option<Value>, loaded: bool) -> Option<R> {
        body.map(extract_items)
            .and_then(|items| items.into_iter().next())
            .map(|item| self.wrap(item, loaded))
    }
}

impl<R> Clone for Manager<R> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            _resource: PhantomData,
        }
    }
}

impl<R: ValenceResource> fmt::Debug for Manager<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("resource", &R::NAME)
            .field("collection", &R::COLLECTION)
            .finish_non_exhaustive()
    }
}
