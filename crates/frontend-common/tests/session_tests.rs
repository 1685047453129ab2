//! Session scenarios against a mock Agendify API

use agendify_frontend_common::{
    AuthConfig, GuardDecision, HistoryNavigator, MemoryNotifier, MemoryStorage, Navigator,
    NoticeLevel, Route, SessionError, SessionState, SessionStorage, SessionStore, StoredSession,
};
use agendify_core::constants::messages;
use agendify_core::{Identity, Role};
use agendify_http::AgendifyClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    store: SessionStore,
    storage: Arc<MemoryStorage>,
    navigator: Arc<HistoryNavigator>,
    notifier: Arc<MemoryNotifier>,
}

fn harness(server: &MockServer, start: Route) -> Harness {
    let client = AgendifyClient::new(server.uri()).unwrap();
    let storage = Arc::new(MemoryStorage::new());
    let navigator = Arc::new(HistoryNavigator::new(start));
    let notifier = Arc::new(MemoryNotifier::new());
    let store = SessionStore::new(client, storage.clone(), navigator.clone(), notifier.clone());
    Harness {
        store,
        storage,
        navigator,
        notifier,
    }
}

fn ana() -> Identity {
    Identity {
        id: "u1".into(),
        name: "Ana".into(),
        surname: "Silva".into(),
        email: "ana@example.com".into(),
        role: Role::Customer,
    }
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1",
        "name": "Ana",
        "surname": "Silva",
        "email": "ana@example.com",
        "role": "USER"
    })
}

async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "ana@example.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": { "token": "tok-1", "user": user_json() }
        })))
        .mount(server)
        .await;
}

async fn signed_in(server: &MockServer) -> Harness {
    mount_login_ok(server).await;
    let h = harness(server, Route::Login);
    h.store.initialize().await;
    h.store.sign_in("ana@example.com", "secret1").await.unwrap();
    h.notifier.drain();
    h
}

#[tokio::test]
async fn test_sign_in_success() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    let h = harness(&server, Route::Login);
    assert_eq!(h.store.initialize().await, SessionState::Anonymous);

    let identity = h.store.sign_in("ana@example.com", "secret1").await.unwrap();

    assert_eq!(identity, ana());
    assert_eq!(h.store.state(), SessionState::Authenticated(ana()));
    assert_eq!(h.storage.get(AuthConfig::TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert!(h.storage.get(AuthConfig::USER_KEY).unwrap().is_some());
    assert_eq!(h.store.client().credential().as_deref().map(String::as_str), Some("tok-1"));
    assert_eq!(h.navigator.current(), Route::Appointments);

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, messages::LOGIN);
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;
    let h = harness(&server, Route::Login);
    h.store.initialize().await;

    let err = h.store.sign_in("ana@example.com", "nope").await.unwrap_err();

    assert!(matches!(err, SessionError::Rejected { .. }));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert_eq!(h.store.state(), SessionState::Anonymous);
    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Invalid credentials");
    assert!(notices.iter().all(|n| n.message != messages::SESSION_EXPIRED));
    assert_eq!(h.navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_sign_in_without_server_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let h = harness(&server, Route::Login);
    h.store.initialize().await;

    let err = h.store.sign_in("ana@example.com", "secret1").await.unwrap_err();
    assert_eq!(err.user_message(), messages::LOGIN_FAILED);
}

#[tokio::test]
async fn test_sign_in_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": { "user": user_json() }
        })))
        .mount(&server)
        .await;
    let h = harness(&server, Route::Login);
    h.store.initialize().await;

    let err = h.store.sign_in("ana@example.com", "secret1").await.unwrap_err();

    assert!(matches!(err, SessionError::MalformedResponse(_)));
    assert_eq!(h.store.state(), SessionState::Anonymous);
    assert!(!h.store.client().has_credential());
    assert_eq!(StoredSession::load(h.storage.as_ref()).unwrap(), None);
}

#[tokio::test]
async fn test_startup_with_valid_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "",
            "data": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Route::Appointments);
    StoredSession {
        credential: "tok-9".into(),
        identity: ana(),
    }
    .save(h.storage.as_ref())
    .unwrap();

    assert_eq!(h.store.state(), SessionState::Uninitialized);
    assert_eq!(h.store.guard(), GuardDecision::Wait);
    assert_eq!(h.store.initialize().await, SessionState::Authenticated(ana()));
    assert_eq!(h.store.guard(), GuardDecision::Allow);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_startup_without_stored_session_makes_no_request() {
    let server = MockServer::start().await;
    let h = harness(&server, Route::Appointments);

    assert_eq!(h.store.initialize().await, SessionState::Anonymous);
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(h.store.guard(), GuardDecision::Redirect(Route::Login));
    assert_eq!(h.navigator.current(), Route::Login);
}

#[tokio::test]
async fn test_expired_session_mid_use() {
    let server = MockServer::start().await;
    let h = signed_in(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .mount(&server)
        .await;

    let err = h
        .store
        .client()
        .list_appointments(&Default::default())
        .await
        .unwrap_err();

    assert!(err.is_auth_rejection());
    assert_eq!(h.store.state(), SessionState::Anonymous);
    assert!(!h.store.client().has_credential());
    assert_eq!(StoredSession::load(h.storage.as_ref()).unwrap(), None);
    assert_eq!(h.navigator.current(), Route::Login);

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, messages::SESSION_EXPIRED);
}

/// Send a slow request that comes back 401, sign in while it is in flight,
/// then let the rejection land
async fn late_rejection_after_sign_in(sent_with: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/appointments/rooms"))
        .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let h = harness(&server, Route::Login);
    h.store.initialize().await;
    h.store.client().set_credential(sent_with);

    let in_flight = tokio::spawn({
        let client = h.store.client().clone();
        async move { client.rooms().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.store.sign_in("ana@example.com", "secret1").await.unwrap();

    assert!(in_flight.await.unwrap().unwrap_err().is_auth_rejection());
    h
}

fn assert_session_survived(h: &Harness) {
    assert_eq!(h.store.state(), SessionState::Authenticated(ana()));
    assert_eq!(
        h.store.client().credential().as_deref().map(String::as_str),
        Some("tok-1")
    );
    assert!(StoredSession::load(h.storage.as_ref()).unwrap().is_some());
    assert_eq!(h.navigator.current(), Route::Appointments);

    let notices = h.notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
}

#[tokio::test]
async fn test_late_rejection_without_credential_keeps_new_session() {
    let h = late_rejection_after_sign_in(None).await;
    assert_session_survived(&h);
}

#[tokio::test]
async fn test_late_rejection_of_replaced_credential_keeps_new_session() {
    let h = late_rejection_after_sign_in(Some("tok-0")).await;
    assert_session_survived(&h);
}

#[tokio::test]
async fn test_wrong_current_password_keeps_session() {
    let server = MockServer::start().await;
    let h = signed_in(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/users/password"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Current password is wrong"})),
        )
        .mount(&server)
        .await;

    let err = h
        .store
        .client()
        .update_password("bad", "newsecret")
        .await
        .unwrap_err();

    assert_eq!(err.server_message(), Some("Current password is wrong"));
    assert_eq!(h.store.state(), SessionState::Authenticated(ana()));
    assert!(h.store.client().has_credential());
    assert!(StoredSession::load(h.storage.as_ref()).unwrap().is_some());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_sign_out_is_idempotent() {
    let server = MockServer::start().await;
    let h = signed_in(&server).await;

    h.store.sign_out();
    h.store.sign_out();

    assert_eq!(h.store.state(), SessionState::Anonymous);
    assert!(!h.store.client().has_credential());
    assert_eq!(StoredSession::load(h.storage.as_ref()).unwrap(), None);
    assert_eq!(h.navigator.current(), Route::Login);
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn test_route_guard_task_follows_state() {
    let server = MockServer::start().await;
    mount_login_ok(&server).await;
    let h = harness(&server, Route::Clients);
    let guard = h.store.spawn_route_guard();
    let mut route = h.navigator.subscribe();

    // Nothing happens while startup is unresolved
    tokio::task::yield_now().await;
    assert_eq!(h.navigator.current(), Route::Clients);

    h.store.initialize().await;
    tokio::time::timeout(Duration::from_secs(2), route.wait_for(|r| *r == Route::Login))
        .await
        .unwrap()
        .unwrap();

    h.store.sign_in("ana@example.com", "secret1").await.unwrap();
    assert_eq!(h.navigator.current(), Route::Appointments);

    // A customer opening the admin page is sent back to the landing page
    h.navigator.navigate(Route::Clients);
    tokio::time::timeout(
        Duration::from_secs(2),
        route.wait_for(|r| *r == Route::Appointments),
    )
    .await
    .unwrap()
    .unwrap();

    drop(h);
    tokio::time::timeout(Duration::from_secs(2), guard)
        .await
        .unwrap()
        .unwrap();
}
