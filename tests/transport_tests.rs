//! Integration tests for the transport: headers, redirects, error
//! classification and connection retries.

use std::net::TcpListener;
use std::time::{Duration, Instant};

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use valence_client::clients::{
    HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, ResponseBody, CLIENT_VERSION,
};
use valence_client::{BaseUrl, ValenceConfig};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(uri: &str, max_retries: u32) -> ValenceConfig {
    ValenceConfig::builder()
        .base_url(BaseUrl::new(uri).unwrap())
        .max_retries(max_retries)
        .retry_interval(Duration::from_secs(1))
        .max_redirects(2)
        .build()
        .unwrap()
}

fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(&config_for(&server.uri(), 0)).unwrap()
}

/// A local address nothing listens on.
fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

// ============================================================================
// Requests and decoding
// ============================================================================

#[tokio::test]
async fn test_json_request_sends_default_headers_and_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flavors"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "f1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = assert_ok!(client.json_request(HttpMethod::Get, "/v1/flavors", None).await);

    assert_eq!(response.code, 200);
    assert_eq!(response.body, ResponseBody::Json(json!([{"uuid": "f1"}])));
}

#[tokio::test]
async fn test_base_url_with_version_suffix_does_not_double_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&format!("{}/v1/", server.uri()), 0);
    let client = HttpClient::new(&config).unwrap();
    assert_ok!(client.json_request(HttpMethod::Get, "v1/nodes", None).await);
}

#[tokio::test]
async fn test_user_agent_carries_prefix() {
    let server = MockServer::start().await;
    let expected = format!(
        "my-tool/1.0 | Valence Client Library v{CLIENT_VERSION} | Rust {}",
        env!("CARGO_PKG_RUST_VERSION")
    );
    Mock::given(method("GET"))
        .and(header("user-agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = ValenceConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .user_agent_prefix("my-tool/1.0")
        .build()
        .unwrap();
    let client = HttpClient::new(&config).unwrap();
    let response = client
        .json_request(HttpMethod::Get, "/v1/nodes", None)
        .await
        .unwrap();
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_json_request_serializes_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/flavors/f1"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "f1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = json!({"name": "renamed"});
    assert_ok!(
        client
            .json_request(HttpMethod::Patch, "/v1/flavors/f1", Some(&body))
            .await
    );
}

#[tokio::test]
async fn test_text_body_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .json_request(HttpMethod::Get, "/v1/ping", None)
        .await
        .unwrap();
    assert_eq!(response.body, ResponseBody::Text("pong".to_string()));
}

#[tokio::test]
async fn test_post_without_body_is_rejected_before_io() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = HttpRequest {
        http_method: HttpMethod::Post,
        path: "/v1/flavors".to_string(),
        body: None,
        extra_headers: None,
    };
    let err = assert_err!(client.request(&request).await);
    assert!(matches!(err, HttpError::Validation(_)));
    assert!(!err.is_retryable());
}

// ============================================================================
// Redirects
// ============================================================================

#[tokio::test]
async fn test_redirect_is_followed_with_same_method_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/nodes"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/v1/nodes/new"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/nodes/new"))
        .and(body_json(json!({"name": "n"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "n1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = json!({"name": "n"});
    let response = client
        .json_request(HttpMethod::Post, "/v1/nodes", Some(&body))
        .await
        .unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.body, ResponseBody::Json(json!({"uuid": "n1"})));
}

#[tokio::test]
async fn test_305_with_absolute_location_is_followed() {
    let server = MockServer::start().await;
    let target = format!("{}/v1/elsewhere", server.uri());
    Mock::given(path("/v1/start"))
        .respond_with(ResponseTemplate::new(305).insert_header("Location", target.as_str()))
        .mount(&server)
        .await;
    Mock::given(path("/v1/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_ok!(client.json_request(HttpMethod::Get, "/v1/start", None).await);
}

#[tokio::test]
async fn test_absolute_path_redirect_resolves_against_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/valence/v1/flavors"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/v1/moved"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/moved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "f1"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/valence/v1/moved"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(&format!("{}/valence", server.uri()), 0);
    let client = HttpClient::new(&config).unwrap();
    let response = assert_ok!(client.json_request(HttpMethod::Get, "/v1/flavors", None).await);
    assert_eq!(response.body, ResponseBody::Json(json!([{"uuid": "f1"}])));
}

#[tokio::test]
async fn test_relative_redirect_resolves_against_request_url() {
    let server = MockServer::start().await;
    Mock::given(path("/valence/v1/nodes"))
        .respond_with(ResponseTemplate::new(305).insert_header("Location", "nodes-v2"))
        .mount(&server)
        .await;
    Mock::given(path("/valence/v1/nodes-v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&format!("{}/valence", server.uri()), 0);
    let client = HttpClient::new(&config).unwrap();
    assert_ok!(client.json_request(HttpMethod::Get, "/v1/nodes", None).await);
}

#[tokio::test]
async fn test_redirect_ceiling_yields_connection_error() {
    let server = MockServer::start().await;
    // Initial request plus two followed redirects.
    Mock::given(path("/v1/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/v1/loop"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = HttpRequest::builder(HttpMethod::Get, "/v1/loop").build().unwrap();
    let err = assert_err!(client.request(&request).await);

    let HttpError::Connection(connection) = err else {
        panic!("expected a connection error, got {err:?}");
    };
    assert!(connection.reason.contains("too many redirects"));
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn test_error_envelope_is_classified() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/nodes/n1"))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("x-openstack-request-id", "req-123")
                .set_body_json(json!({
                    "conflict": {"faultstring": "Node is busy", "debuginfo": "locked by task 7"}
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .json_request(HttpMethod::Delete, "/v1/nodes/n1", None)
        .await
        .unwrap_err();

    let HttpError::Response(response) = err else {
        panic!("expected a response error");
    };
    assert_eq!(response.kind, HttpErrorKind::Conflict);
    assert_eq!(response.http_status, 409);
    assert_eq!(response.message, "Node is busy");
    assert_eq!(response.details.as_deref(), Some("locked by task 7"));
    assert_eq!(response.request_id.as_deref(), Some("req-123"));
    assert_eq!(response.method, HttpMethod::Delete);
    assert!(response.url.ends_with("/v1/nodes/n1"));
    assert_eq!(response.to_string(), "Node is busy (HTTP 409) (Request-ID: req-123)");
}

#[tokio::test]
async fn test_legacy_error_message_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error_message": "{\"faultstring\": \"Unknown flavor\", \"debuginfo\": null}"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let body = json!({"name": "n", "flavor_id": "nope"});
    let err = client
        .json_request(HttpMethod::Post, "/v1/nodes", Some(&body))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(HttpErrorKind::BadRequest));
    let HttpError::Response(response) = err else {
        panic!("expected a response error");
    };
    assert_eq!(response.message, "Unknown flavor");
}

#[tokio::test]
async fn test_server_error_with_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .json_request(HttpMethod::Get, "/v1/systems", None)
        .await
        .unwrap_err();

    // Response errors are never retried.
    assert!(!err.is_retryable());
    let HttpError::Response(response) = err else {
        panic!("expected a response error");
    };
    assert_eq!(response.kind, HttpErrorKind::InternalServerError);
    assert!(response.kind.is_server_error());
    assert_eq!(response.details.as_deref(), Some("internal failure"));
    assert_eq!(response.message, HttpErrorKind::InternalServerError.default_message());
}

#[tokio::test]
async fn test_unregistered_status_falls_back_by_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .json_request(HttpMethod::Get, "/v1/teapot", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(HttpErrorKind::HttpClientError));
    assert_eq!(err.status(), Some(418));
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn test_connection_failure_is_retried_then_reported() {
    let url = closed_port_url();
    let client = HttpClient::new(&config_for(&url, 1)).unwrap();

    let started = Instant::now();
    let err = client
        .json_request(HttpMethod::Get, "/v1/nodes", None)
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Connection(_)));
    assert!(err.is_retryable());
    // One retry, one interval.
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_no_retries_fails_immediately() {
    let url = closed_port_url();
    let client = HttpClient::new(&config_for(&url, 0)).unwrap();

    let started = Instant::now();
    let err = client
        .json_request(HttpMethod::Get, "/v1/nodes", None)
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Connection(_)));
    assert!(started.elapsed() < Duration::from_secs(1));
}
