//! HTTP response types for the Valence client.
//!
//! This module provides the raw [`HttpResponse`], the decoded
//! [`JsonResponse`] and the [`decode_body`] rules that turn one into the
//! other.

use std::collections::HashMap;

use serde_json::Value;

/// Response headers carrying a request correlation id, in lookup order.
pub const REQUEST_ID_HEADERS: [&str; 2] = ["x-openstack-request-id", "x-compute-request-id"];

/// A raw response from the server.
///
/// Header names are stored lower-cased; each name maps to all of its values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers (lower-cased names, multi-valued).
    pub headers: HashMap<String, Vec<String>>,
    /// The response body as text.
    pub text: String,
}

impl HttpResponse {
    /// Creates a new response, lower-casing header names.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, text: String) -> Self {
        let headers = headers
            .into_iter()
            .fold(HashMap::new(), |mut acc: HashMap<String, Vec<String>>, (k, v)| {
                acc.entry(k.to_lowercase()).or_default().extend(v);
                acc
            });
        Self {
            code,
            headers,
            text,
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Content-Type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the request correlation id, if the server sent one.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        REQUEST_ID_HEADERS.iter().find_map(|name| self.header(name))
    }

    /// Returns the `Location` header, if present.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }
}

/// A decoded response body.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// No body, or a body that could not be decoded.
    Empty,
    /// A decoded JSON document.
    Json(Value),
    /// A non-JSON body, passed through verbatim.
    Text(String),
}

impl ResponseBody {
    /// Returns `true` when there is nothing to decode.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the JSON document, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the body, returning the JSON document if any.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Decodes a response body.
///
/// - 204 and 205, or a missing content type, yield [`ResponseBody::Empty`]
///   without looking at the text.
/// - A JSON content type is decoded. A body that is not valid JSON is logged
///   and yields [`ResponseBody::Empty`].
/// - Anything else is returned as [`ResponseBody::Text`].
///
/// # Example
///
/// ```rust
/// use valence_client::clients::{decode_body, ResponseBody};
///
/// assert_eq!(decode_body(204, Some("application/json"), "{}"), ResponseBody::Empty);
/// assert_eq!(
///     decode_body(200, Some("text/plain"), "ok"),
///     ResponseBody::Text("ok".to_string())
/// );
/// ```
#[must_use]
pub fn decode_body(status: u16, content_type: Option<&str>, text: &str) -> ResponseBody {
    let Some(content_type) = content_type else {
        return ResponseBody::Empty;
    };
    if status == 204 || status == 205 {
        return ResponseBody::Empty;
    }

    if content_type.contains("application/json") {
        if text.trim().is_empty() {
            return ResponseBody::Empty;
        }
        return match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                tracing::error!("Could not decode response body as JSON: {}", e);
                ResponseBody::Empty
            }
        };
    }

    ResponseBody::Text(text.to_string())
}

/// A response whose body has been run through [`decode_body`].
#[derive(Clone, Debug, PartialEq)]
pub struct JsonResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers (lower-cased names, multi-valued).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded body.
    pub body: ResponseBody,
}

impl From<HttpResponse> for JsonResponse {
    fn from(response: HttpResponse) -> Self {
        let body = decode_body(response.code, response.content_type(), &response.text);
        Self {
            code: response.code,
            headers: response.headers,
            body,
        }
    }
}
