//! HTTP error mapping
//!
//! Every handler returns `ApiResult`. Domain errors map onto status codes;
//! body is always `{"error": "<message>"}`. Internal errors are logged and
//! answered with a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domain::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Body missing, wrong content type or not valid JSON for the payload
    #[error("invalid request body: {0}")]
    Json(#[from] JsonRejection),

    #[error("invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::NotFound(what.into()))
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::InvalidInput(msg.into()))
    }

    pub fn not_implemented(what: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::NotImplemented(what.into()))
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                DomainError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
                DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Json(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Domain(err) => match err {
                DomainError::NotFound(msg) => format!("{} not found", msg),
                DomainError::InvalidInput(msg)
                | DomainError::Conflict(msg)
                | DomainError::Unauthorized(msg) => msg.clone(),
                DomainError::NotImplemented(msg) => format!("{} is not implemented", msg),
                DomainError::Internal(_) => "internal server error".to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            log::error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::invalid("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DomainError::Conflict("x".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(DomainError::Unauthorized("x".into())).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_implemented("delete").status_code(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            ApiError::from(DomainError::Internal("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::not_found("expenditure e-1").message(), "expenditure e-1 not found");
        assert_eq!(ApiError::not_implemented("delete").message(), "delete is not implemented");
    }

    #[test]
    fn test_internal_error_does_not_leak() {
        let err = ApiError::from(DomainError::Internal("lock poisoned at store.rs".into()));
        assert_eq!(err.message(), "internal server error");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
