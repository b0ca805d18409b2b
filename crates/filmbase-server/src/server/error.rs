//! API error type and its HTTP rendering.
//!
//! Every failure path ends here so callers always see a status code and a
//! JSON body `{"error": <code>, "message": <text>}`. Store failures are
//! logged server-side and reported generically.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use filmbase_core::db::DatabaseError;

use crate::auth::AuthError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient role for this operation")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage unavailable")]
    StoreUnavailable,

    #[error("Internal error")]
    Internal,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::StoreUnavailable => "store_unavailable",
            Self::Internal => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        if e.is_unavailable() {
            error!(error = %e, "Store operation failed");
            return Self::StoreUnavailable;
        }
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            DatabaseError::Conflict(what) => Self::Conflict(what),
            other => {
                error!(error = %other, "Unexpected store error");
                Self::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::Conflict(what) => Self::Conflict(what),
            AuthError::NotFound(what) => Self::NotFound(what),
            AuthError::Validation(why) => Self::Validation(why),
            AuthError::Store(db) => Self::from(db),
            AuthError::Hashing(why) => {
                error!(error = %why, "Password hashing failed");
                Self::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::StoreUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn connection_failure_is_store_unavailable() {
        let err = ApiError::from(DatabaseError::Connection("refused".into()));
        assert!(matches!(err, ApiError::StoreUnavailable));
        assert_eq!(err.to_string(), "Storage unavailable");
    }

    #[test]
    fn missing_row_and_conflict_keep_their_meaning() {
        let err = ApiError::from(DatabaseError::NotFound("Movie m1".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Movie m1 not found");
        let err = ApiError::from(DatabaseError::Conflict("users.email".into()));
        assert_eq!(err.code(), "conflict");
    }

    #[test]
    fn auth_store_failure_maps_through() {
        let err = ApiError::from(AuthError::Store(DatabaseError::Query("locked".into())));
        assert!(matches!(err, ApiError::StoreUnavailable));
        let err = ApiError::from(AuthError::Conflict("taken".into()));
        assert_eq!(err.code(), "conflict");
    }
}
