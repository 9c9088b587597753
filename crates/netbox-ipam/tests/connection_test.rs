//! Transport-level tests against a mock NetBox server

mod common;

use common::{config, connection, fields, init_tracing, TOKEN};
use netbox_ipam::{Connection, ConnectionConfig, NetBoxError, Page, PostOutcome};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn get_sends_auth_headers_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/rirs/"))
        .and(header("Authorization", format!("Token {}", TOKEN).as_str()))
        .and(header("Accept", "application/json"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{"id": 1, "name": "RIPE", "slug": "ripe"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    init_tracing();
    let conn = Connection::new(&config(&server).with_limit(25)).unwrap();
    let page: Page<Value> = conn.get("/ipam/rirs/").await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0]["name"], "RIPE");
}

#[tokio::test]
async fn get_non_200_is_an_error_not_a_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/vrfs/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "detail": "Invalid token."
        })))
        .mount(&server)
        .await;

    let conn = connection(&server);
    let err = conn.get::<Page<Value>>("/ipam/vrfs/").await.unwrap_err();
    match err {
        NetBoxError::UnexpectedStatus { path, status, body } => {
            assert_eq!(path, "/ipam/vrfs/");
            assert_eq!(status, 403);
            assert!(body.contains("Invalid token."));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn post_merges_required_and_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ipam/ip-addresses/"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "address": "10.0.0.5/32",
            "description": "web01"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 9,
            "address": "10.0.0.5/32"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connection(&server);
    let outcome = conn
        .post(
            "/ipam/ip-addresses/",
            fields(json!({"address": "10.0.0.5/32"})),
            &fields(json!({"address": "10.1.1.1/32", "description": "web01"})),
        )
        .await
        .unwrap();

    assert_eq!(outcome, PostOutcome::Created(json!({"id": 9, "address": "10.0.0.5/32"})));
}

#[tokio::test]
async fn post_non_201_surfaces_first_validation_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ipam/rirs/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": ["RIR with this name already exists."],
            "slug": ["RIR with this slug already exists."]
        })))
        .mount(&server)
        .await;

    let conn = connection(&server);
    let outcome = conn
        .post("/ipam/rirs/", fields(json!({"name": "RIPE", "slug": "ripe"})), &fields(json!({})))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        PostOutcome::Rejected {
            status: 400,
            message: "RIR with this name already exists.".to_string()
        }
    );
}

#[tokio::test]
async fn post_200_is_not_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ipam/roles/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let conn = connection(&server);
    let outcome = conn
        .post("/ipam/roles/", fields(json!({"name": "lan", "slug": "lan"})), &fields(json!({})))
        .await
        .unwrap();

    assert_eq!(outcome, PostOutcome::Rejected { status: 200, message: "ok".to_string() });
}

#[tokio::test]
async fn delete_is_true_only_on_204() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/ipam/vrfs/3/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/ipam/vrfs/4/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/ipam/vrfs/5/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let conn = connection(&server);
    assert!(conn.delete("/ipam/vrfs/", 3).await.unwrap());
    assert!(!conn.delete("/ipam/vrfs/", 4).await.unwrap());
    assert!(!conn.delete("/ipam/vrfs/", 5).await.unwrap());
}

#[tokio::test]
async fn put_returns_raw_response() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/ipam/vlans/6/"))
        .and(body_json(json!({"vid": 100, "name": "servers"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "site": ["This field is required."]
        })))
        .mount(&server)
        .await;

    let conn = connection(&server);
    let response = conn
        .put("/ipam/vlans/6/", Some(&json!({"vid": 100, "name": "servers"})))
        .await
        .unwrap();

    assert!(!response.ok);
    assert_eq!(response.status, 400);
    assert_eq!(response.body, json!({"site": ["This field is required."]}));
}

#[tokio::test]
async fn slow_server_is_a_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/prefixes/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    init_tracing();
    let conn = Connection::new(&config(&server).with_timeout(Duration::from_millis(200))).unwrap();
    let err = conn.get::<Page<Value>>("/ipam/prefixes/").await.unwrap_err();
    assert!(matches!(err, NetBoxError::Timeout { ref host } if host == "127.0.0.1"), "{err:?}");
}

#[tokio::test]
async fn stalled_body_is_a_timeout() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"count\": ")
            .await
            .unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    init_tracing();
    let config = ConnectionConfig::new("127.0.0.1", TOKEN)
        .with_tls(false)
        .with_port(port)
        .with_timeout(Duration::from_millis(300));
    let conn = Connection::new(&config).unwrap();

    let err = conn.get::<Page<Value>>("/ipam/prefixes/").await.unwrap_err();
    assert!(matches!(err, NetBoxError::Timeout { ref host } if host == "127.0.0.1"), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_a_connection_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = ConnectionConfig::new("127.0.0.1", TOKEN)
        .with_tls(false)
        .with_port(port)
        .with_timeout(Duration::from_secs(5));
    let conn = Connection::new(&config).unwrap();

    let err = conn.get::<Page<Value>>("/ipam/vrfs/").await.unwrap_err();
    assert!(matches!(err, NetBoxError::Connection { ref host } if host == "127.0.0.1"), "{err:?}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn unresolvable_host_is_a_dns_error() {
    let config = ConnectionConfig::new("netbox.invalid", TOKEN)
        .with_tls(false)
        .with_timeout(Duration::from_secs(5));
    let conn = Connection::new(&config).unwrap();

    let err = conn.get::<Page<Value>>("/ipam/vrfs/").await.unwrap_err();
    assert!(matches!(err, NetBoxError::DnsResolution { ref host } if host == "netbox.invalid"), "{err:?}");
}

#[test]
fn construction_without_token_fails_before_any_request() {
    let config = ConnectionConfig {
        host: Some("netbox.local".to_string()),
        auth_token: None,
        ..ConnectionConfig::default()
    };
    assert!(matches!(Connection::new(&config), Err(NetBoxError::Configuration(_))));
}
