//! Login, registration, logout and identity endpoints.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AppState;
use super::cookie;
use super::error::ApiError;
use super::extract::JsonBody;
use super::interceptor::LOGIN_PATH;
use crate::auth::credentials::Registration;
use crate::auth::{Identity, Role};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub role: Role,
}

/// `POST /api/login` — verify credentials and set the session cookie.
#[instrument(skip_all, fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    // A browser that logs in again drops whatever session it held before.
    let previous = cookie::session_token(&headers);
    let issued = state
        .sessions
        .authenticate_replacing(&req.username, &req.password, previous.as_deref())
        .await?;

    let set_cookie = cookie::session_cookie(&issued.token, &state.cookies);
    Ok((
        [(SET_COOKIE, set_cookie)],
        Json(LoginResponse {
            message: "Login successful",
            role: issued.session.role,
        }),
    )
        .into_response())
}

/// `POST /api/register` — create a `client` account.
#[instrument(skip_all, fields(username = %req.username))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .credentials
        .register(Registration {
            username: &req.username,
            password: &req.password,
            email: req.email.as_deref(),
            role: Role::Client,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Registration successful",
    }))
}

/// `GET /logout` — end the session, clear the cookie, go to the login page.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = cookie::session_token(&headers) {
        state.sessions.invalidate(&token).await?;
    }

    Ok((
        [(SET_COOKIE, cookie::clear_cookie(&state.cookies))],
        Redirect::to(LOGIN_PATH),
    )
        .into_response())
}

/// `GET /api/user-info`
pub async fn user_info(Extension(identity): Extension<Identity>) -> Json<UserInfo> {
    Json(UserInfo {
        username: identity.username,
        role: identity.role,
    })
}
