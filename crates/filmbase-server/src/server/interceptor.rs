//! Session-checking middleware wrapping protected routes.
//!
//! Resolves the session cookie through the [`SessionAuthority`], runs the
//! [`guard`] policy, and either forwards the request with an
//! [`Identity`](crate::auth::Identity)
//! in its extensions or answers on the handler's behalf.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use super::cookie;
use super::error::ApiError;
use crate::auth::{
    AuthError, Decision, EndpointClass, Policy, SessionAuthority, SessionState, guard,
};

pub const LOGIN_PATH: &str = "/login";

/// State carried by one guard layer: the authority and that route's policy.
#[derive(Clone)]
pub struct GuardState {
    sessions: Arc<SessionAuthority>,
    policy: Policy,
}

impl GuardState {
    pub const fn new(sessions: Arc<SessionAuthority>, policy: Policy) -> Self {
        Self { sessions, policy }
    }
}

/// Resolve the caller's session from request headers.
pub async fn resolve_session(
    sessions: &SessionAuthority,
    headers: &HeaderMap,
) -> Result<SessionState, AuthError> {
    match cookie::session_token(headers) {
        Some(token) => sessions.validate(&token).await,
        None => Ok(SessionState::Anonymous),
    }
}

/// Middleware body; install with `axum::middleware::from_fn_with_state`.
pub async fn enforce(
    State(guard_state): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = match resolve_session(&guard_state.sessions, req.headers()).await {
        Ok(session) => session,
        Err(e) => return ApiError::from(e).into_response(),
    };

    let policy = guard_state.policy;
    match guard(policy.roles, &session) {
        Decision::Admit(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Decision::Unauthenticated => {
            debug!(path = %req.uri().path(), "Rejected anonymous request");
            match policy.class {
                EndpointClass::Page => Redirect::to(LOGIN_PATH).into_response(),
                EndpointClass::Api => ApiError::Unauthenticated.into_response(),
            }
        }
        Decision::Forbidden => {
            debug!(path = %req.uri().path(), "Rejected request with insufficient role");
            ApiError::Forbidden.into_response()
        }
    }
}
