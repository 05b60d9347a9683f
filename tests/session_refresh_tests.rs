//! Integration tests for credential attachment, single-flight refresh and
//! exactly-once replay.

mod support;

use std::sync::Arc;
use std::time::Duration;

use cliente_admin::auth::{CredentialPair, CredentialStore, MemoryCredentialStore};
use cliente_admin::error::AdminError;
use cliente_admin::session::{ApiRequest, SessionEvent};
use futures::future::join_all;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{session_for, EventLog};

const CONCURRENT: usize = 5;

async fn mount_clientes(server: &MockServer, bearer: &str, status: u16, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .and(header("authorization", format!("Bearer {bearer}").as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!([])))
        .expect(expected)
        .mount(server)
        .await;
}

fn slow_refresh(response: ResponseTemplate) -> ResponseTemplate {
    // Keeps the refresh in flight long enough for every concurrent 401 to queue.
    response.set_delay(Duration::from_millis(300))
}

#[tokio::test]
async fn attaches_bearer_credential_when_present() {
    let server = MockServer::start().await;
    mount_clientes(&server, "old", 200, 1).await;

    let store = Arc::new(MemoryCredentialStore::with_pair("old", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store, &log);

    let response = client.request(ApiRequest::get("/clientes")).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(log.events().is_empty());
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh_and_all_replay() {
    let server = MockServer::start().await;
    mount_clientes(&server, "old", 401, CONCURRENT as u64).await;
    mount_clientes(&server, "new", 200, CONCURRENT as u64).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(slow_refresh(
            ResponseTemplate::new(200).set_body_json(json!({
                "token": "new",
                "refreshToken": "r2"
            })),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair("old", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store.clone(), &log);

    let results = join_all((0..CONCURRENT).map(|_| client.request(ApiRequest::get("/clientes")))).await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }
    assert_eq!(store.load().unwrap(), Some(CredentialPair::new("new", "r2")));
    assert_eq!(log.events(), vec![SessionEvent::Refreshed]);
    assert!(!client.refresh_state().is_refreshing());
    assert_eq!(client.refresh_state().pending(), 0);
    server.verify().await;
}

#[tokio::test]
async fn failed_refresh_fails_every_waiter_and_ends_session_once() {
    let server = MockServer::start().await;
    mount_clientes(&server, "old", 401, CONCURRENT as u64).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(slow_refresh(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Refresh token expirado ou revogado" })),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair("old", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store.clone(), &log);

    let results = join_all((0..CONCURRENT).map(|_| client.request(ApiRequest::get("/clientes")))).await;

    for result in results {
        assert_eq!(
            result.unwrap_err(),
            AdminError::api(401, "Refresh token expirado ou revogado")
        );
    }
    assert!(store.load().unwrap().is_none());
    assert_eq!(log.ended_count(), 1);
    assert!(!client.refresh_state().is_refreshing());
    server.verify().await;
}

#[tokio::test]
async fn replayed_request_is_not_retried_after_second_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new",
            "refreshToken": "r2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair("old", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store.clone(), &log);

    let err = client.request(ApiRequest::get("/clientes")).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(store.get().unwrap().as_deref(), Some("new"));
    assert_eq!(log.ended_count(), 0);
    server.verify().await;
}

#[tokio::test]
async fn missing_refresh_credential_ends_session_without_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::new());
    let log = EventLog::new();
    let client = session_for(&server, store.clone(), &log);

    let err = client.request(ApiRequest::get("/clientes")).await.unwrap_err();

    assert_eq!(err, AdminError::api(401, "Unauthorized"));
    assert!(store.load().unwrap().is_none());
    assert_eq!(
        log.events(),
        vec![SessionEvent::Ended {
            reason: "no refresh credential".to_string()
        }]
    );
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
    server.verify().await;
}

#[tokio::test]
async fn non_401_errors_propagate_without_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair("old", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store.clone(), &log);

    let err = client.request(ApiRequest::get("/clientes")).await.unwrap_err();

    assert_eq!(err, AdminError::api(500, "boom"));
    assert!(store.is_present());
    assert!(log.events().is_empty());
    server.verify().await;
}

#[tokio::test]
async fn replay_reissues_same_method_path_and_body() {
    let server = MockServer::start().await;
    let body = json!({ "nome": "Ana Souza", "cpf": "123.456.789-00", "endereco": "Rua A, 10" });
    Mock::given(method("PUT"))
        .and(path("/api/clientes/7"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/clientes/7"))
        .and(header("authorization", "Bearer new"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new",
            "refreshToken": "r2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair("old", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store, &log);

    let request = ApiRequest::put("/clientes/7").json(&body).unwrap();
    let response = client.request(request).await.unwrap();

    assert_eq!(response.json::<serde_json::Value>().unwrap()["id"], 7);
    server.verify().await;
}

#[tokio::test]
async fn later_expiry_starts_a_new_refresh_cycle() {
    let server = MockServer::start().await;
    mount_clientes(&server, "a1", 401, 1).await;
    mount_clientes(&server, "a2", 401, 2).await;
    mount_clientes(&server, "a3", 200, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "a2",
            "refreshToken": "r2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "r2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "a3",
            "refreshToken": "r3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_pair("a1", "r1"));
    let log = EventLog::new();
    let client = session_for(&server, store.clone(), &log);

    // First cycle: refresh to a2, replay with a2 is rejected and not retried.
    // The second call then opens with a2 as well, hence two hits on that mock.
    let first = client.request(ApiRequest::get("/clientes")).await;
    assert!(first.unwrap_err().is_unauthorized());

    // Second call starts from idle and refreshes again.
    let second = client.request(ApiRequest::get("/clientes")).await.unwrap();
    assert_eq!(second.status, 200);
    assert_eq!(store.load().unwrap(), Some(CredentialPair::new("a3", "r3")));
    server.verify().await;
}
