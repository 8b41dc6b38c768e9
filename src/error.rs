//! Error types for the panel backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Host Error Enum ==
/// Failure talking to the host application.
#[derive(Error, Debug)]
pub enum HostError {
    /// The host could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The host answered with an unexpected status
    #[error("Host returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The host answered with a body we could not understand
    #[error("Invalid host response: {0}")]
    InvalidResponse(String),

    /// The host rejected the operation
    #[error("Host error: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HostError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            HostError::Network("Failed to connect to host".to_string())
        } else if err.is_decode() {
            HostError::InvalidResponse(err.to_string())
        } else {
            HostError::Network(err.to_string())
        }
    }
}

// == Panel Error Enum ==
/// Error type for the panel HTTP API.
#[derive(Error, Debug)]
pub enum PanelError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Host call failed
    #[error(transparent)]
    Host(#[from] HostError),
}

// == IntoResponse Implementation ==
impl IntoResponse for PanelError {
    fn into_response(self) -> Response {
        let status = match &self {
            PanelError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PanelError::Host(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the panel API.
pub type Result<T> = std::result::Result<T, PanelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_maps_to_bad_request() {
        let response = PanelError::InvalidRequest("empty id".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_host_error_maps_to_bad_gateway() {
        let err: PanelError = HostError::Network("down".to_string()).into();
        assert_eq!(err.to_string(), "Network error: down");
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_status_error_message() {
        let err = HostError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Host returned status 500: boom");
    }
}
