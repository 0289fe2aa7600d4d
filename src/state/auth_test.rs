use super::*;

use httpmock::prelude::*;
use serde_json::json;

use crate::config::ClientConfig;

fn user(username: &str) -> User {
    User {
        username: username.to_string(),
        email: format!("{username}@example.test"),
        ..User::default()
    }
}

fn store(server: &MockServer, dir: &tempfile::TempDir) -> (Arc<ApiClient>, AuthStore) {
    let client = Arc::new(
        ApiClient::from_config(ClientConfig {
            backend_url: format!("{}/api", server.base_url()),
            token_file: dir.path().join("token"),
        })
        .unwrap(),
    );
    let store = AuthStore::new(Arc::clone(&client));
    (client, store)
}

// =============================================================
// Reducer
// =============================================================

#[test]
fn initial_state_is_idle() {
    let state = AuthState::default();
    assert_eq!(state.status, Status::Idle);
    assert!(state.user.is_none());
    assert!(state.token.is_none());
    assert!(state.error.is_none());
}

#[test]
fn pending_sets_loading_for_every_operation() {
    for op in [AuthOp::Login, AuthOp::Register, AuthOp::GetUser, AuthOp::UpdateUser] {
        let mut state = AuthState::default();
        state.apply(AuthEvent::Pending(op));
        assert_eq!(state.status, Status::Loading, "{op:?}");
    }
}

#[test]
fn fulfilled_reaches_success_and_clears_error() {
    for op in [AuthOp::Login, AuthOp::Register, AuthOp::GetUser, AuthOp::UpdateUser] {
        let mut state = AuthState {
            status: Status::Error,
            error: Some(ApiError::single("email", "is invalid")),
            ..AuthState::default()
        };
        state.apply(AuthEvent::Pending(op));
        state.apply(AuthEvent::Fulfilled {
            op,
            token: Some("abc".to_string()),
            user: user("x"),
        });

        assert_eq!(
            state,
            AuthState {
                status: Status::Success,
                token: Some("abc".to_string()),
                user: Some(user("x")),
                error: None,
            },
            "{op:?}"
        );
    }
}

#[test]
fn login_rejected_captures_error_and_keeps_user_and_token() {
    let mut state = AuthState {
        status: Status::Success,
        user: Some(user("x")),
        token: Some("abc".to_string()),
        error: None,
    };
    state.apply(AuthEvent::Pending(AuthOp::Login));
    state.apply(AuthEvent::Rejected {
        op: AuthOp::Login,
        error: ApiError::single("email or password", "is invalid"),
    });

    assert_eq!(state.status, Status::Error);
    assert_eq!(state.error, Some(ApiError::single("email or password", "is invalid")));
    assert_eq!(state.user, Some(user("x")));
    assert_eq!(state.token.as_deref(), Some("abc"));
}

#[test]
fn non_login_rejections_leave_state_unchanged() {
    for op in [AuthOp::Register, AuthOp::GetUser, AuthOp::UpdateUser] {
        let mut state = AuthState::default();
        state.apply(AuthEvent::Pending(op));
        let after_pending = state.clone();

        state.apply(AuthEvent::Rejected { op, error: ApiError::single("username", "is taken") });
        assert_eq!(state, after_pending, "{op:?}");
    }
}

#[test]
fn logout_resets_to_initial_from_any_state() {
    let mut state = AuthState {
        status: Status::Success,
        user: Some(user("x")),
        token: Some("abc".to_string()),
        error: None,
    };
    state.apply(AuthEvent::Logout);
    assert_eq!(state, AuthState::default());

    let mut state = AuthState {
        status: Status::Error,
        error: Some(ApiError::network()),
        ..AuthState::default()
    };
    state.apply(AuthEvent::Logout);
    assert_eq!(state, AuthState::default());
}

#[test]
fn set_token_touches_only_the_token() {
    let mut state = AuthState {
        status: Status::Success,
        user: Some(user("x")),
        token: None,
        error: None,
    };
    state.apply(AuthEvent::SetToken(Some("abc".to_string())));

    assert_eq!(state.token.as_deref(), Some("abc"));
    assert_eq!(state.status, Status::Success);
    assert_eq!(state.user, Some(user("x")));
}

// =============================================================
// Store lifecycle
// =============================================================

#[tokio::test]
async fn login_success_updates_state_and_persists_token() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/users/login");
        then.status(200).json_body(
            json!({"user": {"username": "anna", "email": "anna@example.test", "token": "jwt.tok"}}),
        );
    });

    let (client, store) = store(&server, &dir);
    store.login("anna@example.test", "pw").await.unwrap();

    let state = store.state();
    assert_eq!(state.status, Status::Success);
    assert_eq!(state.token.as_deref(), Some("jwt.tok"));
    assert!(state.error.is_none());

    let logged_in = state.user.unwrap();
    assert_eq!(logged_in.username, "anna");
    assert!(logged_in.token.is_none(), "token is split out of the stored user");

    assert_eq!(client.session().token().as_deref(), Some("jwt.tok"));
    assert_eq!(std::fs::read_to_string(dir.path().join("token")).unwrap(), "jwt.tok");
}

#[tokio::test]
async fn login_failure_is_captured_into_state() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/users/login");
        then.status(422).json_body(json!({"errors": {"email or password": ["is invalid"]}}));
    });

    let (_, store) = store(&server, &dir);
    let err = store.login("anna@example.test", "wrong").await.unwrap_err();

    assert_eq!(err, ApiError::single("email or password", "is invalid"));
    let state = store.state();
    assert_eq!(state.status, Status::Error);
    assert_eq!(state.error, Some(err));
    assert!(state.user.is_none());
}

#[tokio::test]
async fn register_failure_returns_error_but_leaves_state_loading() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/users");
        then.status(422).json_body(json!({"errors": {"username": ["is taken"]}}));
    });

    let (_, store) = store(&server, &dir);
    let err = store.register("anna", "anna@example.test", "pw").await.unwrap_err();
    assert_eq!(err, ApiError::single("username", "is taken"));

    // Rejection is unwired for register; only the pending transition fired.
    let state = store.state();
    assert_eq!(state.status, Status::Loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn operations_are_suppressed_while_one_is_in_flight() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/users");
        then.status(200).json_body(json!({"user": {"username": "anna", "email": "a@e.t"}}));
    });

    let (_, store) = store(&server, &dir);
    store.dispatch(AuthEvent::Pending(AuthOp::Login));

    store.register("anna", "anna@example.test", "pw").await.unwrap();

    mock.assert_hits(0);
    let state = store.state();
    assert_eq!(state.status, Status::Loading);
    assert!(state.user.is_none());
}

#[tokio::test]
async fn fetch_current_user_reaches_success() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/user")
            .header("authorization", "Token jwt.tok");
        then.status(200)
            .json_body(json!({"user": {"username": "anna", "email": "anna@example.test", "token": "jwt.tok"}}));
    });

    let (client, store) = store(&server, &dir);
    client.credentials().set(Some("jwt.tok"));
    store.fetch_current_user().await.unwrap();

    let state = store.state();
    assert_eq!(state.status, Status::Success);
    assert_eq!(state.user.map(|u| u.username), Some("anna".to_string()));
}

#[tokio::test]
async fn logout_resets_state_and_clears_credential() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/users/login");
        then.status(200)
            .json_body(json!({"user": {"username": "anna", "email": "a@e.t", "token": "jwt.tok"}}));
    });

    let (client, store) = store(&server, &dir);
    store.login("a@e.t", "pw").await.unwrap();
    store.logout();

    assert_eq!(store.state(), AuthState::default());
    assert!(client.session().token().is_none());
    assert!(!dir.path().join("token").exists());
}

#[tokio::test]
async fn restore_seeds_session_and_state_token() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("token"), "jwt.persisted").unwrap();
    let server = MockServer::start_async().await;

    let (client, store) = store(&server, &dir);
    assert_eq!(store.restore().as_deref(), Some("jwt.persisted"));

    let state = store.state();
    assert_eq!(state.status, Status::Idle);
    assert_eq!(state.token.as_deref(), Some("jwt.persisted"));
    assert_eq!(client.session().token().as_deref(), Some("jwt.persisted"));
}
