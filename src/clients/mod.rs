//! HTTP transport for Valence API communication.
//!
//! This module provides the transport layer every resource manager goes
//! through: path joining, default headers, JSON encoding and decoding,
//! redirect following, bounded retry of connection failures, and
//! classification of error responses.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client that owns the connection pool
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A raw response from the API
//! - [`JsonResponse`] / [`ResponseBody`]: A response with its body decoded
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`RetryPolicy`] / [`with_retries`]: Bounded retry of connection failures
//! - [`HttpError`], [`HttpErrorKind`], [`classify`]: The error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use valence_client::{BaseUrl, ValenceConfig};
//! use valence_client::clients::{HttpClient, HttpMethod};
//!
//! let config = ValenceConfig::builder()
//!     .base_url(BaseUrl::new("http://valence.local:8181")?)
//!     .build()?;
//! let client = HttpClient::new(&config)?;
//!
//! let response = client.json_request(HttpMethod::Get, "/v1/nodes", None).await?;
//! println!("{:?}", response.body);
//! ```
//!
//! # Retry Behavior
//!
//! - **Connection failures** (refused, DNS, TLS, timeout): retried up to
//!   `max_retries` times, `retry_interval` apart
//! - **Error responses** (any status >= 400): never retried
//! - **Validation failures**: never retried, no network call is made

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;

pub use errors::{
    classify, ConnectionError, HttpError, HttpErrorKind, HttpResponseError, ValidationError,
};
pub use http_client::{HttpClient, CLIENT_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{decode_body, HttpResponse, JsonResponse, ResponseBody, REQUEST_ID_HEADERS};
pub use retry::{with_retries, RetryPolicy};
