// Crate errors and the proxy's HTTP error surface
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use thiserror::Error;

use crate::intercept::InterceptError;
use crate::session::SessionError;
use crate::transport::TransportError;

/// Top-level error for client operations
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Intercept(#[from] InterceptError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ScopeError {
    /// Transport failures, whether raised directly or through the pipeline
    pub fn is_transport(&self) -> bool {
        match self {
            ScopeError::Transport(_) => true,
            ScopeError::Intercept(e) => e.is_transport(),
            ScopeError::Session(_) => false,
        }
    }
}

/// HTTP error returned by the scoping proxy
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (upstream unreachable or failing)
    BadGateway(String),

    // 504 Gateway Timeout
    GatewayTimeout(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::GatewayTimeout(_) => 504,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::GatewayTimeout(msg) => msg,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::GatewayTimeout(_) => "GATEWAY_TIMEOUT",
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout { url } => {
                tracing::error!("Upstream timed out: {}", url);
                ApiError::GatewayTimeout("Upstream API timed out".to_string())
            }
            TransportError::InvalidUrl { url, reason } => {
                ApiError::bad_request(format!("Invalid target '{}': {}", url, reason))
            }
            other => {
                tracing::error!("Upstream transport error: {}", other);
                ApiError::bad_gateway("Upstream API unavailable")
            }
        }
    }
}

impl From<ScopeError> for ApiError {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::Transport(e) | ScopeError::Intercept(InterceptError::Transport(e)) => e.into(),
            ScopeError::Intercept(e) => {
                // Only reachable with a fail-closed policy
                tracing::error!("Interception error: {}", e);
                ApiError::internal_server_error("Request could not be scoped to the session")
            }
            ScopeError::Session(SessionError::MissingSessionId) => {
                ApiError::bad_request("No session id configured")
            }
            ScopeError::Session(SessionError::InvalidSessionId(id)) => {
                ApiError::bad_request(format!("Invalid session id '{}'", id))
            }
            ScopeError::Session(SessionError::Status { session_id, status }) if status == 404 => {
                ApiError::not_found(format!("Session '{}' not found", session_id))
            }
            ScopeError::Session(e) => {
                tracing::error!("Session lookup failed: {}", e);
                ApiError::bad_gateway("Session lookup failed")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_map_to_gateway_errors() {
        let timeout: ApiError = TransportError::Timeout { url: "http://u/x".into() }.into();
        assert_eq!(timeout.status_code(), 504);

        let refused: ApiError = ScopeError::Intercept(InterceptError::Transport(TransportError::Connect {
            url: "http://u/x".into(),
            reason: "refused".into(),
        }))
        .into();
        assert_eq!(refused.status_code(), 502);
        assert_eq!(refused.to_json()["code"], "BAD_GATEWAY");
    }

    #[test]
    fn missing_session_maps_to_not_found() {
        let err: ApiError = ScopeError::Session(SessionError::Status {
            session_id: "sess_9".into(),
            status: 404,
        })
        .into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Session 'sess_9' not found");
    }

    #[test]
    fn scope_error_detects_transport_failures() {
        let err = ScopeError::Intercept(InterceptError::Transport(TransportError::Timeout { url: "x".into() }));
        assert!(err.is_transport());
        assert!(!ScopeError::Session(SessionError::MissingSessionId).is_transport());
    }
}
