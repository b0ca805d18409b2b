//! Request extractors whose rejections render as [`ApiError`].

use axum::extract::FromRequest;

use super::error::ApiError;

/// JSON request body. A missing or malformed body, or a wrong content
/// type, becomes a `400 validation_error` instead of axum's plain-text 415/422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
