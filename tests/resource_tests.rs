//! Integration tests for the resource managers and the per-resource clients.

use serde_json::{json, Map, Value};
use tokio_test::{assert_err, assert_ok};
use valence_client::clients::{HttpError, HttpErrorKind};
use valence_client::{BaseUrl, Client, CommonFields, ResourceError, ValenceConfig};
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = ValenceConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .max_retries(0)
        .build()
        .unwrap();
    Client::new(&config).unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

// ============================================================================
// Pod managers
// ============================================================================

#[tokio::test]
async fn test_create_podmanager_posts_once_and_returns_resource() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/pod_managers"))
        .and(body_json(json!({"name": "podm-1", "url": "https://10.0.0.2:8443"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "abc",
            "name": "podm-1",
            "url": "https://10.0.0.2:8443",
            "status": "Online"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let podm = assert_ok!(
        client
            .pod_managers
            .create_podmanager(object(json!({"name": "podm-1", "url": "https://10.0.0.2:8443"})))
            .await
    );

    assert_eq!(podm.uuid(), Some("abc"));
    assert_eq!(podm.status(), Some("Online"));
    assert!(!podm.is_loaded());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.to_string(), "POST");
    assert_eq!(requests[0].url.path(), "/v1/pod_managers");
}

#[tokio::test]
async fn test_create_with_unknown_attribute_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(
        client
            .pod_managers
            .create_podmanager(object(json!({"name": "podm-1", "color": "red", "size": 3})))
            .await
    );

    match &err {
        ResourceError::InvalidAttribute { attributes, .. } => {
            assert_eq!(attributes, &["color".to_string(), "size".to_string()]);
        }
        other => panic!("expected InvalidAttribute, got {other:?}"),
    }
    assert!(err.is_client_side());
    assert_eq!(
        err.to_string(),
        "The attribute(s) \"color\",\"size\" are invalid: they are not needed to create pod_managers."
    );
}

#[tokio::test]
async fn test_delete_missing_podmanager_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/pod_managers/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": {"message": "not found"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.pod_managers.delete_podmanager("gone").await.unwrap_err();

    assert_eq!(err.http_kind(), Some(HttpErrorKind::NotFound));
    let ResourceError::Http(HttpError::Response(response)) = err else {
        panic!("expected a classified response");
    };
    assert_eq!(response.message, "not found");
}

// ============================================================================
// Listing and lookup
// ============================================================================

#[tokio::test]
async fn test_list_unwraps_values_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flavors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                {"uuid": "f1", "name": "small"},
                {"uuid": "f2", "name": "large"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let flavors = client.flavors.list_flavors().await.unwrap();

    let names: Vec<_> = flavors.iter().filter_map(|f| f.name()).collect();
    assert_eq!(names, ["small", "large"]);
    assert!(flavors.iter().all(|f| f.is_loaded()));
}

#[tokio::test]
async fn test_list_plain_array_skips_empty_members() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "n1", "index": 3},
            null,
            {},
            {"uuid": "n2", "index": "7"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let nodes = client.nodes.list_nodes().await.unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].index().as_deref(), Some("3"));
    assert_eq!(nodes[1].index().as_deref(), Some("7"));
}

#[tokio::test]
async fn test_empty_list_body_is_empty_vec() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let flavors = client.flavors.list_flavors().await.unwrap();
    assert!(flavors.is_empty());
}

#[tokio::test]
async fn test_list_systems_sends_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/systems"))
        .and(query_param("podm_id", "p 1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uuid": "s1", "power_state": "On"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let systems = client.systems.list_systems(&[("podm_id", "p 1")]).await.unwrap();
    assert_eq!(systems.len(), 1);
    assert_eq!(systems[0].power_state(), Some("On"));
}

#[tokio::test]
async fn test_show_system_with_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/systems/s1"))
        .and(query_param("podm_id", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "s1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let system = client.systems.show_system("s1", &[("podm_id", "p1")]).await.unwrap();
    assert_eq!(system.unwrap().uuid(), Some("s1"));
}

#[tokio::test]
async fn test_get_with_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes/n1"))
        .and(query_param("fields", "uuid,name"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"uuid": "n1", "name": "node-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let node = client
        .nodes
        .manager()
        .get("n1", Some(&["uuid", "name"]))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(node.name(), Some("node-1"));
    assert!(node.is_loaded());
}

#[tokio::test]
async fn test_find_requires_exactly_one_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/flavors"))
        .and(query_param("name", "small"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"uuid": "f1"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/flavors"))
        .and(query_param("name", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/flavors"))
        .and(query_param("name", "dup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"uuid": "f1"}, {"uuid": "f2"}])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let flavors = client.flavors.manager();

    let found = assert_ok!(flavors.find(&[("name", "small")]).await);
    assert_eq!(found.uuid(), Some("f1"));

    let err = assert_err!(flavors.find(&[("name", "none")]).await);
    assert!(matches!(err, ResourceError::NotFound { .. }));

    let err = assert_err!(flavors.find(&[("name", "dup")]).await);
    assert!(matches!(err, ResourceError::NoUniqueMatch { .. }));
}

// ============================================================================
// Nodes
// ============================================================================

#[tokio::test]
async fn test_manage_node_posts_index_and_podm() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/nodes/manage"))
        .and(body_json(json!({"node_index": "5", "podm_id": "p1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "n5",
            "index": "5",
            "podm_id": "p1",
            "resource_uri": "/redfish/v1/Nodes/5"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let node = client.nodes.manage_node("5", "p1").await.unwrap();
    assert_eq!(node.podm_id(), Some("p1"));
    assert_eq!(node.resource_uri(), Some("/redfish/v1/Nodes/5"));
}

#[tokio::test]
async fn test_compose_with_empty_response_is_empty_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/nodes"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .nodes
        .compose_node(object(json!({"name": "n", "flavor_id": "f1"})))
        .await
        .unwrap_err();
    assert!(matches!(err, ResourceError::EmptyResponse { .. }));
}

#[tokio::test]
async fn test_created_node_loads_missing_attribute_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/nodes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"uuid": "n1", "name": "node-1"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "n1",
            "name": "node-1",
            "index": "1",
            "podm_id": "p1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut node = client
        .nodes
        .compose_node(object(json!({"name": "node-1", "flavor_id": "f1"})))
        .await
        .unwrap();
    assert!(!node.is_loaded());

    let podm = node.get_or_fetch("podm_id").await.unwrap().cloned();
    assert_eq!(podm, Some(json!("p1")));
    assert!(node.is_loaded());

    // Still absent after the fetch: no second request.
    assert_eq!(node.get_or_fetch("status").await.unwrap(), None);
    assert_eq!(node.index().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_update_flavor_uses_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/flavors/f1"))
        .and(body_json(json!({"name": "medium"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"uuid": "f1", "name": "medium"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let flavor = client
        .flavors
        .update_flavor("f1", &json!({"name": "medium"}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(flavor.name(), Some("medium"));
}

#[tokio::test]
async fn test_failed_lazy_load_is_not_repeated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uuid": "n1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/nodes/n1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut node = client
        .nodes
        .compose_node(object(json!({"name": "node-1", "flavor_id": "f1"})))
        .await
        .unwrap();

    let err = assert_err!(node.get_or_fetch("power_state").await);
    assert_eq!(err.http_kind(), Some(HttpErrorKind::ServiceUnavailable));
    assert!(node.is_loaded());

    assert_eq!(node.get_or_fetch("power_state").await.unwrap(), None);
    assert_eq!(node.get_or_fetch("podm_id").await.unwrap(), None);
}
