//! Tests for the login/registration handlers, called directly.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::{Extension, Json};

use super::AppState;
use super::auth_svc::{LoginRequest, RegisterRequest, login, logout, register, user_info};
use super::error::ApiError;
use super::extract::JsonBody;
use super::interceptor::resolve_session;
use crate::auth::{Identity, Role, SessionAuthority, SessionState};
use crate::storage::FilmDatabase;

async fn setup() -> AppState {
    let db = FilmDatabase::open_in_memory().await.unwrap();
    let sessions = Arc::new(SessionAuthority::new(db.clone(), 3600).unwrap());
    AppState::new(db, sessions, true)
}

fn alice_register() -> RegisterRequest {
    RegisterRequest {
        username: "alice".into(),
        password: "pw1".into(),
        email: Some("alice@example.com".into()),
    }
}

fn alice_login() -> LoginRequest {
    LoginRequest {
        username: "alice".into(),
        password: "pw1".into(),
    }
}

/// Turn a `Set-Cookie` value into request headers carrying that cookie.
fn cookie_headers(set_cookie: &HeaderValue) -> HeaderMap {
    let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(pair).unwrap());
    headers
}

#[tokio::test]
async fn register_creates_client() {
    let state = setup().await;
    let Json(resp) = register(State(state.clone()), JsonBody(alice_register()))
        .await
        .unwrap();
    assert_eq!(resp.message, "Registration successful");

    let user = state.credentials.find_by_username("alice").await.unwrap();
    assert_eq!(user.role, Role::Client);
    assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    assert_ne!(user.password_hash, "pw1");
}

#[tokio::test]
async fn register_duplicate_is_conflict() {
    let state = setup().await;
    let _ = register(State(state.clone()), JsonBody(alice_register()))
        .await
        .unwrap();
    let err = register(State(state), JsonBody(alice_register()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_sets_secure_cookie_bound_to_session() {
    let state = setup().await;
    let _ = register(State(state.clone()), JsonBody(alice_register()))
        .await
        .unwrap();

    let resp = login(State(state.clone()), HeaderMap::new(), JsonBody(alice_login()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp.headers().get(SET_COOKIE).unwrap();
    let text = set_cookie.to_str().unwrap();
    assert!(text.contains("HttpOnly"));
    assert!(text.contains("SameSite=Lax"));
    assert!(text.contains("Max-Age=3600"));
    assert!(text.ends_with("; Secure"));

    let headers = cookie_headers(set_cookie);
    match resolve_session(&state.sessions, &headers).await.unwrap() {
        SessionState::Authenticated(session) => {
            assert_eq!(session.username, "alice");
            assert_eq!(session.role, Role::Client);
        }
        SessionState::Anonymous => panic!("expected an authenticated session"),
    }
}

#[tokio::test]
async fn login_wrong_password_is_invalid_credentials() {
    let state = setup().await;
    let _ = register(State(state.clone()), JsonBody(alice_register()))
        .await
        .unwrap();

    let err = login(
        State(state),
        HeaderMap::new(),
        JsonBody(LoginRequest {
            username: "alice".into(),
            password: "wrong".into(),
        }),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidCredentials));
}

#[tokio::test]
async fn logout_clears_cookie_and_session() {
    let state = setup().await;
    let _ = register(State(state.clone()), JsonBody(alice_register()))
        .await
        .unwrap();
    let resp = login(State(state.clone()), HeaderMap::new(), JsonBody(alice_login()))
        .await
        .unwrap();
    let headers = cookie_headers(resp.headers().get(SET_COOKIE).unwrap());

    let resp = logout(State(state.clone()), headers.clone()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/login");
    let cleared = resp.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    assert_eq!(
        resolve_session(&state.sessions, &headers).await.unwrap(),
        SessionState::Anonymous
    );
}

#[tokio::test]
async fn logout_without_cookie_still_redirects() {
    let state = setup().await;
    let resp = logout(State(state), HeaderMap::new()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn user_info_echoes_identity() {
    let Json(info) = user_info(Extension(Identity {
        user_id: "u1".into(),
        username: "admin".into(),
        role: Role::Admin,
    }))
    .await;
    assert_eq!(info.username, "admin");
    assert_eq!(info.role, Role::Admin);
}
