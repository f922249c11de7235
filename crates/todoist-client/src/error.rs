//! # Client Error Types
//!
//! Unified error handling for Todoist REST and sync-command operations.

use thiserror::Error;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Comprehensive error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {field} - {reason}")]
    InvalidResponse { field: String, reason: String },
}

impl ClientError {
    /// Create an API error from HTTP response
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid response error for protocol violations
    ///
    /// Use this when a response body is missing required fields or contains
    /// malformed data that should not be silently defaulted.
    pub fn invalid_response(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the remote service reported the target as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::ApiError { status: 404, .. })
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_constructor() {
        let err = ClientError::api_error(404, "not found");
        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "not found");
            }
            _ => panic!("Expected ApiError variant"),
        }
    }

    #[test]
    fn test_config_error_constructor() {
        let err = ClientError::config_error("missing token");
        match err {
            ClientError::ConfigError(msg) => assert_eq!(msg, "missing token"),
            _ => panic!("Expected ConfigError variant"),
        }
    }

    #[test]
    fn test_invalid_response_constructor() {
        let err = ClientError::invalid_response("sync_status", "missing");
        match err {
            ClientError::InvalidResponse { field, reason } => {
                assert_eq!(field, "sync_status");
                assert_eq!(reason, "missing");
            }
            _ => panic!("Expected InvalidResponse variant"),
        }
    }

    #[test]
    fn test_is_not_found() {
        assert!(ClientError::api_error(404, "Task not found").is_not_found());
        assert!(!ClientError::api_error(403, "Forbidden").is_not_found());
        assert!(!ClientError::config_error("x").is_not_found());
    }

    #[test]
    fn test_display_api_error() {
        let err = ClientError::api_error(503, "service down");
        assert_eq!(format!("{err}"), "API error: 503 - service down");
    }

    #[test]
    fn test_display_config_error() {
        let err = ClientError::config_error("TODOIST_API_TOKEN is required");
        assert_eq!(
            format!("{err}"),
            "Configuration error: TODOIST_API_TOKEN is required"
        );
    }

    #[test]
    fn test_display_invalid_response() {
        let err = ClientError::invalid_response("results", "expected array");
        assert_eq!(format!("{err}"), "Invalid response: results - expected array");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{{bad}}").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::SerializationError(_)));
    }
}
