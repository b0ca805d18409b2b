//! Access guard: the per-request admission policy.
//!
//! [`guard`] is a pure function of the required roles and the resolved
//! [`SessionState`]. It is evaluated on every request; decisions are never
//! cached. The HTTP wiring lives in `server::interceptor`.

use serde::Serialize;

use super::role::Role;
use super::session::SessionState;

/// Identity forwarded to handlers after admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Admit(Identity),
    /// No live session.
    Unauthenticated,
    /// Live session whose role is not in the required set.
    Forbidden,
}

/// How an `Unauthenticated` decision is rendered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointClass {
    /// Browser page: redirect to the login page.
    Page,
    /// JSON API: 401.
    Api,
}

/// Admission requirements for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub roles: Option<&'static [Role]>,
    pub class: EndpointClass,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Policy {
    /// Any authenticated page view.
    pub const fn page() -> Self {
        Self {
            roles: None,
            class: EndpointClass::Page,
        }
    }

    /// Any authenticated API call.
    pub const fn api() -> Self {
        Self {
            roles: None,
            class: EndpointClass::Api,
        }
    }

    pub const fn page_roles(roles: &'static [Role]) -> Self {
        Self {
            roles: Some(roles),
            class: EndpointClass::Page,
        }
    }

    pub const fn api_roles(roles: &'static [Role]) -> Self {
        Self {
            roles: Some(roles),
            class: EndpointClass::Api,
        }
    }

    pub const fn page_admin() -> Self {
        Self::page_roles(ADMIN_ONLY)
    }

    pub const fn api_admin() -> Self {
        Self::api_roles(ADMIN_ONLY)
    }
}

/// Decide whether a request carrying `session` may proceed.
pub fn guard(required_roles: Option<&[Role]>, session: &SessionState) -> Decision {
    let SessionState::Authenticated(session) = session else {
        return Decision::Unauthenticated;
    };

    if let Some(roles) = required_roles {
        if !roles.contains(&session.role) {
            return Decision::Forbidden;
        }
    }

    Decision::Admit(Identity {
        user_id: session.user_id.clone(),
        username: session.username.clone(),
        role: session.role,
    })
}
