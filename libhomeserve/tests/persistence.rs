//! Cold start, selective persistence and token handling across restarts

mod common;

use std::sync::Arc;

use common::{auth_response, booking, user};
use libhomeserve::api::mock::MockTransport;
use libhomeserve::api::{LoginRequest, OtpRequest, SignupRequest};
use libhomeserve::slices::UiAction;
use libhomeserve::store::persist::{PersistedState, SNAPSHOT_VERSION};
use libhomeserve::types::{BookingStatus, UserRole};
use libhomeserve::{ActionError, FileStorage, MemoryStorage, RootState, StateStorage, Store};
use serde_json::json;
use tempfile::TempDir;

fn file_store(temp_dir: &TempDir) -> (Store, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let storage = FileStorage::new(temp_dir.path().join("state.json"));
    (Store::new(mock.clone(), Box::new(storage)), mock)
}

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "ana@example.com".to_string(),
        password: "secret".to_string(),
    }
}

#[tokio::test]
async fn test_cold_start_without_snapshot_is_initial_state() {
    let temp_dir = TempDir::new().unwrap();
    let (store, mock) = file_store(&temp_dir);

    assert_eq!(*store.state(), RootState::default());
    assert!(mock.token().is_none());
}

#[tokio::test]
async fn test_cold_start_restores_auth_and_user_only() {
    let temp_dir = TempDir::new().unwrap();
    {
        let (store, mock) = file_store(&temp_dir);
        mock.respond("POST /api/auth/login", auth_response("t1"))
            .respond("GET /api/user/profile", user("u1"))
            .respond("GET /api/bookings", vec![booking("b1", BookingStatus::Pending)]);

        store.login(credentials()).await.unwrap();
        store.fetch_profile().await.unwrap();
        store.fetch_bookings().await.unwrap();
        store.dispatch(UiAction::ShowLoading);
    }

    let (store, mock) = file_store(&temp_dir);
    let state = store.state();

    assert!(state.auth.is_authenticated);
    assert_eq!(state.auth.user, Some(user("u1")));
    assert_eq!(state.auth.token.as_deref(), Some("t1"));
    assert_eq!(state.auth.refresh_token.as_deref(), Some("t1-refresh"));
    assert_eq!(state.user.profile, Some(user("u1")));
    assert!(!state.auth.status.loading);

    assert!(state.booking.bookings().is_empty());
    assert!(!state.ui.global_loading);

    // The restored token goes out with the first request
    assert_eq!(mock.token().as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_corrupt_snapshot_falls_back_to_initial_state() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("state.json"), "{\"version\": 1, \"auth\": 42").unwrap();

    let (store, _) = file_store(&temp_dir);

    assert_eq!(*store.state(), RootState::default());
}

#[tokio::test]
async fn test_snapshot_excludes_status_fields() {
    let storage = Arc::new(MemoryStorage::new());
    let mock = Arc::new(MockTransport::new());
    let store = Store::new(mock.clone(), Box::new(storage.clone()));

    mock.fail("POST /api/auth/login", ActionError::status(401));
    let _ = store.login(credentials()).await;
    assert!(storage.contents().is_none(), "a failed login changes nothing durable");

    mock.respond("POST /api/auth/login", auth_response("t1"));
    store.login(credentials()).await.unwrap();

    let raw = storage.contents().unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot["version"], SNAPSHOT_VERSION);
    assert_eq!(snapshot["auth"]["token"], "t1");
    assert!(snapshot["auth"].get("status").is_none());
    assert!(snapshot["auth"].get("loading").is_none());
    assert!(snapshot.get("booking").is_none());
}

#[tokio::test]
async fn test_login_sets_transport_token() {
    let (store, mock) = common::setup_store();
    mock.respond("POST /api/auth/login", auth_response("t1"))
        .respond("GET /api/bookings", json!([]));

    store.login(credentials()).await.unwrap();
    store.fetch_bookings().await.unwrap();

    assert_eq!(mock.token().as_deref(), Some("t1"));
    let sent = mock.last_request("GET /api/bookings").unwrap();
    assert_eq!(sent.token.as_deref(), Some("t1"));

    // The login request itself went out anonymously
    let login = mock.last_request("POST /api/auth/login").unwrap();
    assert!(login.token.is_none());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_fails() {
    let storage = Arc::new(MemoryStorage::new());
    let mock = Arc::new(MockTransport::new());
    let store = Store::new(mock.clone(), Box::new(storage.clone()));
    mock.respond("POST /api/auth/login", auth_response("t1"))
        .respond("GET /api/user/profile", user("u1"))
        .respond(
            "GET /api/user/addresses",
            json!([{ "id": "a1", "label": "Home", "line": "Rua Augusta 10", "isDefault": true }]),
        )
        .fail("POST /api/auth/logout", ActionError::Network("offline".to_string()));
    store.login(credentials()).await.unwrap();
    store.fetch_profile().await.unwrap();
    store.fetch_addresses().await.unwrap();
    assert_eq!(store.state().user.addresses.len(), 1);

    store.logout().await;

    let state = store.state();
    assert!(!state.auth.is_authenticated);
    assert!(state.auth.user.is_none());
    assert!(state.auth.token.is_none());
    assert!(state.auth.refresh_token.is_none());
    assert!(state.auth.status.error.is_none());
    assert!(!state.auth.status.loading);
    assert!(mock.token().is_none());
    assert!(state.user.profile.is_none());
    assert!(state.user.addresses.is_empty());

    // The logout request carried the old token
    let logout = mock.last_request("POST /api/auth/logout").unwrap();
    assert_eq!(logout.token.as_deref(), Some("t1"));

    // A restart after logout comes back signed out
    let restarted = Store::new(Arc::new(MockTransport::new()), Box::new(storage));
    assert!(!restarted.state().auth.is_authenticated);
    assert!(restarted.state().user.profile.is_none());
    assert!(restarted.state().user.addresses.is_empty());
}

#[tokio::test]
async fn test_signup_awaiting_verification_then_otp() {
    let (store, mock) = common::setup_store();
    mock.respond(
        "POST /api/auth/signup",
        json!({ "user": user("u1"), "needsVerification": true }),
    )
    .respond("POST /api/auth/verify-otp", auth_response("t9"));

    let response = store
        .signup(SignupRequest {
            name: "Ana Silva".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+351900000000".to_string(),
            password: "secret".to_string(),
            role: UserRole::Customer,
        })
        .await
        .unwrap();
    assert!(response.needs_verification);

    let state = store.state();
    assert!(!state.auth.is_authenticated);
    assert!(state.auth.awaiting_verification);
    assert_eq!(state.auth.user, Some(user("u1")));
    assert!(state.auth.token.is_none());
    assert!(mock.token().is_none());

    store
        .verify_otp(OtpRequest {
            phone: "+351900000000".to_string(),
            otp: "123456".to_string(),
        })
        .await
        .unwrap();

    let state = store.state();
    assert!(state.auth.is_authenticated);
    assert!(!state.auth.awaiting_verification);
    assert_eq!(mock.token().as_deref(), Some("t9"));
}

#[test]
fn test_outdated_snapshot_version_is_ignored() {
    let mut state = RootState::default();
    state.auth.is_authenticated = true;
    state.auth.token = Some("old".to_string());
    let mut snapshot = PersistedState::capture(&state);
    snapshot.version = 0;

    let storage = MemoryStorage::new();
    storage.save(&serde_json::to_string(&snapshot).unwrap()).unwrap();
    let store = Store::new(Arc::new(MockTransport::new()), Box::new(storage));

    assert!(!store.state().auth.is_authenticated);
}
