//! Page routes. Each page is a static shell; the data comes from `/api/*`.
//! These handlers only decide who gets which shell.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};

use super::AppState;
use super::error::ApiError;
use super::interceptor::resolve_session;
use crate::auth::SessionState;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Filmbase</title></head>
<body><h1>Filmbase</h1><ul id="movies"></ul><a href="/logout">Log out</a></body></html>"#;

const ADD_MOVIE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Filmbase - Add movie</title></head>
<body><h1>Add movie</h1><form id="add-movie"></form></body></html>"#;

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Filmbase - Log in</title></head>
<body><h1>Log in</h1><form id="login"></form><a href="/register">Register</a></body></html>"#;

const REGISTER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Filmbase - Register</title></head>
<body><h1>Register</h1><form id="register"></form><a href="/login">Log in</a></body></html>"#;

/// `GET /` (any signed-in user)
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// `GET /add_movie` (admin)
pub async fn add_movie_page() -> Html<&'static str> {
    Html(ADD_MOVIE_PAGE)
}

/// `GET /login` — signed-in users go straight to the catalog.
pub async fn login_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    anonymous_only(&state, &headers, LOGIN_PAGE).await
}

/// `GET /register`
pub async fn register_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    anonymous_only(&state, &headers, REGISTER_PAGE).await
}

async fn anonymous_only(
    state: &AppState,
    headers: &HeaderMap,
    page: &'static str,
) -> Result<Response, ApiError> {
    match resolve_session(&state.sessions, headers).await? {
        SessionState::Authenticated(_) => Ok(Redirect::to("/").into_response()),
        SessionState::Anonymous => Ok(Html(page).into_response()),
    }
}
