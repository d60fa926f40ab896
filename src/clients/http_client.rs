//! HTTP client for Valence API communication.
//!
//! This module provides the [`HttpClient`] type: the single owner of the
//! connection pool, shared by every manager of one [`Client`](crate::Client).

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::errors::{classify, ConnectionError, HttpError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::{HttpResponse, JsonResponse};
use crate::clients::retry::{with_retries, RetryPolicy};
use crate::config::{BaseUrl, ValenceConfig};

/// Library version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const JSON: &str = "application/json";

/// HTTP client for making requests to the Valence API.
///
/// The client handles:
/// - Joining partial paths onto the normalized base URL
/// - Default headers including User-Agent
/// - Following 302/305 redirects up to a configured ceiling
/// - Classifying error responses
/// - Retrying connection-level failures (in [`json_request`](Self::json_request))
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use valence_client::{BaseUrl, ValenceConfig};
/// use valence_client::clients::{HttpClient, HttpMethod};
///
/// let config = ValenceConfig::builder()
///     .base_url(BaseUrl::new("http://valence.local:8181")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let response = client.json_request(HttpMethod::Get, "/v1/flavors", None).await?;
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Normalized endpoint (no trailing slash, no `/v1`).
    base_url: BaseUrl,
    /// Retry policy for connection failures.
    retry_policy: RetryPolicy,
    /// Maximum number of redirects followed per request.
    max_redirects: u32,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Connection`] if the underlying HTTP client cannot
    /// be created (for example, TLS initialization failure).
    pub fn new(config: &ValenceConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}Valence Client Library v{CLIENT_VERSION} | Rust {rust_version}"
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        // Redirects are followed by hand so the ceiling and logging apply.
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                HttpError::Connection(ConnectionError {
                    url: config.base_url().to_string(),
                    reason: "failed to create HTTP client".to_string(),
                    source: Some(e),
                })
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            retry_policy: RetryPolicy::from(config),
            max_redirects: config.max_redirects(),
            default_headers,
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the retry policy applied by [`json_request`](Self::json_request).
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Performs one logical request.
    ///
    /// The request is validated, sent once, and any 302/305 response is
    /// followed by re-issuing the identical request at its `Location`. No
    /// retrying happens here; see [`with_retries`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`Validation`)
    /// - The server cannot be reached, or too many redirects are seen (`Connection`)
    /// - The response status is >= 400 (`Response`, classified)
    pub async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut headers = self.default_headers.clone();
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut url = self.base_url.join(&request.path);
        let mut redirects: u32 = 0;

        loop {
            self.log_curl_request(request, &headers, &url);

            let mut req_builder = self.client.request(request.http_method.into(), &url);
            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }
            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.clone());
            }

            let res = req_builder
                .send()
                .await
                .map_err(|e| HttpError::from_reqwest(&url, e))?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let text = res
                .text()
                .await
                .map_err(|e| HttpError::from_reqwest(&url, e))?;
            let response = HttpResponse::new(code, res_headers, text);

            Self::log_http_response(&response);

            if code >= 400 {
                return Err(classify(&response, request.http_method, &url).into());
            }

            if code == 302 || code == 305 {
                let Some(location) = response.location() else {
                    return Err(ConnectionError {
                        url,
                        reason: format!("HTTP {code} response without a Location header"),
                        source: None,
                    }
                    .into());
                };
                if redirects >= self.max_redirects {
                    return Err(ConnectionError {
                        url,
                        reason: format!("too many redirects (limit {})", self.max_redirects),
                        source: None,
                    }
                    .into());
                }
                redirects += 1;
                url = resolve_location(&url, location)?;
                tracing::debug!("Following HTTP {} redirect to {}", code, url);
                continue;
            }

            return Ok(response);
        }
    }

    /// Sends a JSON request and decodes the response body.
    ///
    /// Sets `Content-Type` and `Accept` to `application/json`, serializes
    /// `body`, retries connection failures per the client's retry policy and
    /// decodes the response with [`decode_body`](crate::clients::decode_body).
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] as [`request`](Self::request) does, after retries.
    pub async fn json_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<JsonResponse, HttpError> {
        let mut builder = HttpRequest::builder(method, path)
            .header("Content-Type", JSON)
            .header("Accept", JSON);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }
        let request = builder.build()?;

        let request = &request;
        let response = with_retries(self.retry_policy, move || self.request(request)).await?;
        Ok(JsonResponse::from(response))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn log_curl_request(&self, request: &HttpRequest, headers: &HashMap<String, String>, url: &str) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        let mut curl = vec![format!("curl -i -X {}", request.http_method)];
        for (key, value) in headers {
            curl.push(format!("-H '{key}: {value}'"));
        }
        if let Some(body) = &request.body {
            curl.push(format!("-d '{}'", mask_password(body)));
        }
        curl.push(url.to_string());
        tracing::debug!(base_url = %self.base_url, "{}", curl.join(" "));
    }

    fn log_http_response(response: &HttpResponse) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        let mut dump = vec![format!("HTTP {}", response.code)];
        let mut names: Vec<&String> = response.headers.keys().collect();
        names.sort();
        for name in names {
            for value in &response.headers[name] {
                dump.push(format!("{name}: {value}"));
            }
        }
        if !response.text.is_empty() {
            dump.push(String::new());
            dump.push(mask_password(&response.text));
        }
        tracing::debug!("\n{}", dump.join("\n"));
    }
}

/// Resolves a redirect `Location` against the URL that produced it.
fn resolve_location(current: &str, location: &str) -> Result<String, ConnectionError> {
    url::Url::parse(current)
        .and_then(|base| base.join(location))
        .map(String::from)
        .map_err(|e| ConnectionError {
            url: current.to_string(),
            reason: format!("invalid redirect location {location:?}: {e}"),
            source: None,
        })
}

/// Replaces the values of password-like fields in a JSON document with `***`.
///
/// Text that is not JSON is returned unchanged.
pub(crate) fn mask_password(text: &str) -> String {
    fn mask(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, item) in map.iter_mut() {
                    let key = key.to_lowercase();
                    if key.contains("password") || key.contains("secret") {
                        *item = Value::String("***".to_string());
                    } else {
                        mask(item);
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(mask),
            _ => {}
        }
    }

    match serde_json::from_str::<Value>(text) {
        Ok(mut value) => {
            mask(&mut value);
            value.to_string()
        }
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: Option<&str>) -> ValenceConfig {
        let mut builder =
            ValenceConfig::builder().base_url(BaseUrl::new("http://valence.local:8181/v1/").unwrap());
        if let Some(prefix) = prefix {
            builder = builder.user_agent_prefix(prefix);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_client_construction_normalizes_base_url() {
        let client = HttpClient::new(&config(None)).unwrap();
        assert_eq!(client.base_url().as_ref(), "http://valence.local:8181");
        assert_eq!(client.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&config(None)).unwrap();
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("Valence Client Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let client = HttpClient::new(&config(Some("rsd-tools/1.0"))).unwrap();
        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("rsd-tools/1.0 | Valence Client Library"));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn test_resolve_location_against_request_url() {
        let current = "http://gw.local/valence/v1/flavors";
        assert_eq!(
            resolve_location(current, "/v1/moved").unwrap(),
            "http://gw.local/v1/moved"
        );
        assert_eq!(
            resolve_location(current, "other").unwrap(),
            "http://gw.local/valence/v1/other"
        );
        assert_eq!(
            resolve_location(current, "https://elsewhere/v1/x").unwrap(),
            "https://elsewhere/v1/x"
        );
        assert!(resolve_location("not a url", "/v1").is_err());
    }

    #[test]
    fn test_mask_password_hides_nested_credentials() {
        let body = r#"{"name":"pm1","authentication":[{"type":"basic","auth_items":{"username":"admin","password":"hunter2"}}]}"#;
        let masked = mask_password(body);
        assert!(!masked.contains("hunter2"));
        assert!(masked.contains(r#""password":"***""#));
        assert!(masked.contains(r#""username":"admin""#));
    }

    #[test]
    fn test_mask_password_passes_through_non_json() {
        assert_eq!(mask_password("plain text"), "plain text");
    }
}
