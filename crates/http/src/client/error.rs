//! Client error types

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Error payload returned by the API
///
/// Endpoints disagree on the field name, so both `message` and `error` are
/// read. The raw body is kept for bodies that are not JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(skip)]
    pub raw: String,
}

impl ApiErrorBody {
    pub fn parse(raw: String) -> Self {
        let mut body = serde_json::from_str::<Self>(&raw).unwrap_or_default();
        body.raw = raw;
        body
    }

    /// The human-readable reason supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.server_message().unwrap_or(&self.raw))
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: ApiErrorBody },

    /// The credential was missing, invalid or expired (HTTP 401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(ApiErrorBody),

    #[error("Resource not found: {0}")]
    NotFound(ApiErrorBody),

    #[error("Bad request: {0}")]
    BadRequest(ApiErrorBody),

    #[error("Forbidden: {0}")]
    Forbidden(ApiErrorBody),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A success response lacked fields the caller relies on
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and raw body
    pub fn from_status(status: reqwest::StatusCode, raw: String) -> Self {
        let raw = if raw.trim().is_empty() {
            status.to_string()
        } else {
            raw
        };
        let body = ApiErrorBody::parse(raw);
        match status.as_u16() {
            400 => Self::BadRequest(body),
            401 => Self::AuthenticationFailed(body),
            403 => Self::Forbidden(body),
            404 => Self::NotFound(body),
            _ => Self::ServerError {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// Whether the server rejected the credential
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    /// The reason supplied by the server, for status errors that carried one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::ServerError { body, .. }
            | Self::AuthenticationFailed(body)
            | Self::NotFound(body)
            | Self::BadRequest(body)
            | Self::Forbidden(body) => body.server_message(),
            _ => None,
        }
    }

    /// Text to show the user: the server's reason, or `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_reads_message_field() {
        let err = ClientError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"message":"Invalid email or password"}"#.into(),
        );
        assert!(err.is_auth_rejection());
        assert_eq!(err.server_message(), Some("Invalid email or password"));
    }

    #[test]
    fn test_from_status_reads_error_field() {
        let err = ClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Current password is incorrect"}"#.into(),
        );
        assert!(matches!(err, ClientError::BadRequest(_)));
        assert_eq!(err.user_message("fallback"), "Current password is incorrect");
    }

    #[test]
    fn test_plain_body_falls_back() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, "upstream down".into());
        assert!(matches!(err, ClientError::ServerError { status: 502, .. }));
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message("Try again"), "Try again");
        assert_eq!(err.to_string(), "Server error 502: upstream down");
    }

    #[test]
    fn test_empty_body_uses_status_text() {
        let err = ClientError::from_status(StatusCode::NOT_FOUND, String::new());
        assert_eq!(err.to_string(), "Resource not found: 404 Not Found");
    }
}
