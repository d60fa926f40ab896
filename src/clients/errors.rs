//! HTTP-specific error types for the Valence client.
//!
//! This module contains the transport error taxonomy: classified HTTP
//! response errors, connection failures and client-side request validation
//! failures.
//!
//! # Error Handling
//!
//! The client uses specific error types for different failure scenarios:
//!
//! - [`HttpResponseError`]: A response with status >= 400, classified by [`classify`]
//! - [`ConnectionError`]: The server could not be reached or the exchange did not complete
//! - [`ValidationError`]: A request was rejected before any network call
//! - [`HttpError`]: Unified error type encompassing all of the above
//!
//! Only [`HttpError::Connection`] is retried by the transport. Responses are
//! never retried, whatever their status.
//!
//! # Example
//!
//! ```rust,ignore
//! use valence_client::clients::{HttpError, HttpErrorKind};
//!
//! match client.json_request(HttpMethod::Get, "/v1/nodes/42", None).await {
//!     Ok(response) => println!("{:?}", response.body),
//!     Err(HttpError::Response(e)) if e.kind == HttpErrorKind::NotFound => {
//!         println!("no such node");
//!     }
//!     Err(e) => println!("{e}"),
//! }
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::HttpResponse;

/// The kind of a classified HTTP error response.
///
/// Exact status codes map to a named kind. Anything else falls back by range:
/// [`HttpServerError`](Self::HttpServerError) for 5xx and above,
/// [`HttpClientError`](Self::HttpClientError) for the remaining 4xx codes,
/// and [`Http`](Self::Http) for every other status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 406
    NotAcceptable,
    /// 408
    RequestTimeout,
    /// 409
    Conflict,
    /// 413
    RequestEntityTooLarge,
    /// 415
    UnsupportedMediaType,
    /// 500
    InternalServerError,
    /// 501
    HttpNotImplemented,
    /// 502
    BadGateway,
    /// 503
    ServiceUnavailable,
    /// 504
    GatewayTimeout,
    /// Any other status >= 500.
    HttpServerError,
    /// Any other status in `400..500`.
    HttpClientError,
    /// Any status outside the conventional error ranges.
    Http,
}

impl HttpErrorKind {
    /// Selects the error kind for a status code.
    ///
    /// This is total: every status maps to exactly one kind.
    ///
    /// # Example
    ///
    /// ```rust
    /// use valence_client::clients::HttpErrorKind;
    ///
    /// assert_eq!(HttpErrorKind::from_status(404), HttpErrorKind::NotFound);
    /// assert_eq!(HttpErrorKind::from_status(418), HttpErrorKind::HttpClientError);
    /// assert_eq!(HttpErrorKind::from_status(507), HttpErrorKind::HttpServerError);
    /// ```
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            406 => Self::NotAcceptable,
            408 => Self::RequestTimeout,
            409 => Self::Conflict,
            413 => Self::RequestEntityTooLarge,
            415 => Self::UnsupportedMediaType,
            500 => Self::InternalServerError,
            501 => Self::HttpNotImplemented,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            500.. => Self::HttpServerError,
            400..=499 => Self::HttpClientError,
            _ => Self::Http,
        }
    }

    /// Returns the message used when the response body does not carry one.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized, invalid username or password",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::NotAcceptable => "Not Acceptable",
            Self::RequestTimeout => "Request Timeout",
            Self::Conflict => "Conflict",
            Self::RequestEntityTooLarge => "Request Entity Too Large",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::InternalServerError => "Internal Server Error",
            Self::HttpNotImplemented => "Not Implemented",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
            Self::HttpServerError => "HTTP Server Error",
            Self::HttpClientError => "HTTP Client Error",
            Self::Http => "HTTP Error",
        }
    }

    /// Returns `true` for kinds produced by 4xx statuses.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::BadRequest
                | Self::Unauthorized
                | Self::Forbidden
                | Self::NotFound
                | Self::MethodNotAllowed
                | Self::NotAcceptable
                | Self::RequestTimeout
                | Self::Conflict
                | Self::RequestEntityTooLarge
                | Self::UnsupportedMediaType
                | Self::HttpClientError
        )
    }

    /// Returns `true` for kinds produced by 5xx (and higher) statuses.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        matches!(
            self,
            Self::InternalServerError
                | Self::HttpNotImplemented
                | Self::BadGateway
                | Self::ServiceUnavailable
                | Self::GatewayTimeout
                | Self::HttpServerError
        )
    }
}

#[allow(clippy::ref_option)]
fn request_id_suffix(request_id: &Option<String>) -> String {
    request_id
        .as_deref()
        .map_or_else(String::new, |id| format!(" (Request-ID: {id})"))
}

/// Error returned when a request receives a response with status >= 400.
///
/// Renders as `"<message> (HTTP <status>)"`, followed by
/// `" (Request-ID: <id>)"` when the server sent a correlation id.
///
/// # Example
///
/// ```rust
/// use valence_client::clients::{HttpErrorKind, HttpMethod, HttpResponseError};
///
/// let error = HttpResponseError {
///     kind: HttpErrorKind::NotFound,
///     http_status: 404,
///     message: "Node 42 not found".to_string(),
///     details: None,
///     request_id: Some("req-1".to_string()),
///     method: HttpMethod::Get,
///     url: "http://valence/v1/nodes/42".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Node 42 not found (HTTP 404) (Request-ID: req-1)");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (HTTP {http_status}){}", request_id_suffix(.request_id))]
pub struct HttpResponseError {
    /// The classified kind.
    pub kind: HttpErrorKind,
    /// The HTTP status code of the response.
    pub http_status: u16,
    /// The server's message, or the kind's default message.
    pub message: String,
    /// Additional detail text (debug info or the raw text body).
    pub details: Option<String>,
    /// Request correlation id from the response headers.
    pub request_id: Option<String>,
    /// The method of the failed request.
    pub method: HttpMethod,
    /// The URL of the failed request.
    pub url: String,
}

/// Classifies a failed HTTP exchange into an [`HttpResponseError`].
///
/// This is pure and total: it never fails and accepts any status code,
/// including ones outside the conventional ranges. A body that cannot be
/// decoded simply yields no message or details.
///
/// Recognized JSON envelopes:
///
/// - `{"<any-key>": {"message"|"faultstring": ..., "details"|"debuginfo": ...}}`
/// - `{"error_message": "<JSON-encoded object with faultstring/debuginfo>"}`
///
/// A `text/*` body is used verbatim as the details.
#[must_use]
pub fn classify(response: &HttpResponse, method: HttpMethod, url: &str) -> HttpResponseError {
    let kind = HttpErrorKind::from_status(response.code);
    let content_type = response.content_type().unwrap_or_default();

    let (message, details) = if content_type.starts_with("application/json") {
        serde_json::from_str::<Value>(&response.text)
            .ok()
            .and_then(|body| extract_envelope(&body))
            .unwrap_or((None, None))
    } else if content_type.starts_with("text/") {
        (None, Some(response.text.clone()))
    } else {
        (None, None)
    };

    HttpResponseError {
        kind,
        http_status: response.code,
        message: message.unwrap_or_else(|| kind.default_message().to_string()),
        details,
        request_id: response.request_id().map(String::from),
        method,
        url: url.to_string(),
    }
}

type Envelope = (Option<String>, Option<String>);

fn extract_envelope(body: &Value) -> Option<Envelope> {
    let object = body.as_object()?;

    // Legacy form: the whole fault is a JSON document inside a string.
    if let Some(raw) = object.get("error_message").and_then(Value::as_str) {
        if let Ok(Value::Object(fault)) = serde_json::from_str::<Value>(raw) {
            return Some(fields_from(&fault, body));
        }
    }

    object
        .values()
        .find_map(Value::as_object)
        .map(|fault| fields_from(fault, body))
}

fn fields_from(fault: &Map<String, Value>, body: &Value) -> Envelope {
    let text = |keys: &[&str]| {
        keys.iter()
            .filter_map(|key| fault.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null | Value::String(_) => None,
                other => Some(other.to_string()),
            })
    };

    let message = text(&["message", "faultstring"]);
    let details = text(&["details", "debuginfo"]).or_else(|| Some(body.to_string()));
    (message, details)
}

/// Error returned when the server cannot be reached or the exchange fails
/// before a complete response is received.
///
/// Covers DNS failures, refused connections, TLS failures, timeouts and
/// redirect loops. This is the only error the transport retries.
#[derive(Debug, Error)]
#[error("Error has occurred while handling request for {url}: {reason}")]
pub struct ConnectionError {
    /// The URL being requested.
    pub url: String,
    /// A human-readable reason.
    pub reason: String,
    /// The underlying HTTP library error, if any.
    #[source]
    pub source: Option<reqwest::Error>,
}

/// Error returned when a request fails validation before being sent.
///
/// # Example
///
/// ```rust
/// use valence_client::clients::{HttpMethod, ValidationError};
///
/// let error = ValidationError::MissingBody { method: HttpMethod::Post };
/// assert_eq!(error.to_string(), "Cannot use POST without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A POST, PUT or PATCH request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: HttpMethod,
    },

    /// The request URL is malformed or uses an unsupported scheme.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that was rejected.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Unified error type for all HTTP-related errors.
///
/// # Example
///
/// ```rust,ignore
/// use valence_client::clients::HttpError;
///
/// match result {
///     Ok(response) => { /* handle success */ }
///     Err(HttpError::Response(e)) => { /* classified API error */ }
///     Err(HttpError::Connection(e)) => { /* retries exhausted */ }
///     Err(HttpError::Validation(e)) => { /* rejected client-side */ }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// A classified error response (status >= 400).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Connection-level failure.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Request rejected client-side.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl HttpError {
    /// Returns `true` if the failed call may be re-attempted as is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the classified kind for response errors.
    #[must_use]
    pub const fn kind(&self) -> Option<HttpErrorKind> {
        match self {
            Self::Response(e) => Some(e.kind),
            _ => None,
        }
    }

    /// Returns the HTTP status for response errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.http_status),
            _ => None,
        }
    }

    /// Maps an HTTP library failure for `url` onto the taxonomy.
    pub(crate) fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_builder() {
            return Self::Validation(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: error.to_string(),
            });
        }
        let reason = if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        };
        Self::Connection(ConnectionError {
            url: url.to_string(),
            reason,
            source: Some(error),
        })
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};
