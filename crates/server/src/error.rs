//! Mapping of extraction failures onto HTTP responses.
//!
//! Every failure is answered with `{"error": "<message>"}`.

use std::any::Any;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagecut_core::PagecutError;
use serde_json::json;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn missing_url() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Missing 'url' field")
    }

    pub fn domain_not_allowed(allowed: &[String]) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            format!("This scraper only works for {}", allowed.join(", ")),
        )
    }
}

impl From<PagecutError> for ApiError {
    fn from(err: PagecutError) -> Self {
        match err {
            PagecutError::ContentNotFound => Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            other => {
                error!(error = %other, "scrape failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Turns a caught panic into a 500 whose `error` is the panic message.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "Internal server error".to_string());

    error!(error = %message, "request handler panicked");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_not_found_is_unprocessable() {
        let err = ApiError::from(PagecutError::ContentNotFound);
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "Could not extract blog content");
    }

    #[test]
    fn test_other_errors_keep_message() {
        let err = ApiError::from(PagecutError::HttpStatus { status: 404 });
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("404"));
    }

    #[test]
    fn test_panic_payloads_become_500() {
        let formatted: Box<dyn Any + Send> = Box::new(format!("bad {}", 1));
        let literal: Box<dyn Any + Send> = Box::new("bad");
        let opaque: Box<dyn Any + Send> = Box::new(7_u8);

        for payload in [formatted, literal, opaque] {
            assert_eq!(panic_response(payload).status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_domain_message_lists_domains() {
        let err = ApiError::domain_not_allowed(&["safeguardglobal.com".to_string()]);
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message, "This scraper only works for safeguardglobal.com");
    }
}
