//! The error sink: uniform failure envelopes.
//!
//! Every failure the gateway emits goes through [`ApiError`], so response
//! formatting is decided in exactly one place. The connection gate's 500 and
//! the router's 404 are instances of the same shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// The wire shape of every failure response:
/// `{"status":"error","message":…,"error":…?}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A failure ready to become a response.
///
/// `detail` is raw internal error text; construction sites attach it only
/// when the process runs in development mode, so nothing here needs to
/// consult configuration.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Attach raw error detail. Callers gate this on development mode.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// The connection gate's dedicated envelope.
    pub fn store_unavailable() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database connection failed",
        )
    }

    pub fn payload_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    }

    /// The router's not-found envelope, echoing the unmatched path.
    pub fn route_not_found(path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("API route {path} not found"),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            status: "error",
            message: self.message,
            error: self.detail,
        };
        (self.status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_omitted_when_absent() {
        let envelope = ErrorEnvelope {
            status: "error",
            message: "boom".to_string(),
            error: None,
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"status":"error","message":"boom"}"#);
    }

    #[test]
    fn detail_is_serialized_when_present() {
        let envelope = ErrorEnvelope {
            status: "error",
            message: "boom".to_string(),
            error: Some("stack".to_string()),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(json.contains(r#""error":"stack""#));
    }

    #[test]
    fn not_found_echoes_the_path() {
        let err = ApiError::route_not_found("/api/ghosts");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "API route /api/ghosts not found");
    }
}
