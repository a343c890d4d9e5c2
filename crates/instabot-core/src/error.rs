//! Unified error types for the instabot crates.
//!
//! Three layers, three enums:
//!
//! - [`TransportError`]: the request never produced an HTTP response.
//! - [`ApiError`]: a client operation failed (platform error, bad config, …).
//! - [`DecodeError`]: an inbound webhook payload could not be decoded.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur while moving a request over the wire.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header, …).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// Connection or I/O failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Platform error response
// =============================================================================

/// The `error` object returned by the Graph API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub code: i32,
    #[serde(default, rename = "error_subcode")]
    pub sub_code: i32,
    #[serde(default)]
    pub fbtrace_id: String,
}

/// Error response received from the messaging API.
///
/// `status_code` is filled from the HTTP status; the body is decoded on a
/// best-effort basis, so an undecodable body leaves `error` at its default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "platform error (HTTP {status_code}, code {}, subcode {}): {}",
    .error.code,
    .error.sub_code,
    .error.message
)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub status_code: u16,
    #[serde(default)]
    pub error: ApiErrorBody,
}

fn is_zero(v: &u16) -> bool {
    *v == 0
}

impl ErrorResponse {
    /// Builds an error response from a non-2xx HTTP status and its raw body.
    pub fn from_body(status_code: u16, body: &[u8]) -> Self {
        let mut response: ErrorResponse = serde_json::from_slice(body).unwrap_or_default();
        response.status_code = status_code;
        response
    }
}

// =============================================================================
// API Errors
// =============================================================================

/// Error type for client API calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The client was constructed without a page access token.
    #[error("missing page access token")]
    MissingAccessToken,

    /// The client configuration is unusable.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The platform answered with a non-2xx status.
    #[error(transparent)]
    Platform(#[from] ErrorResponse),

    /// Failed to serialize a request or deserialize a response.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Webhook Decode Errors
// =============================================================================

/// Error returned when a webhook payload cannot be decoded.
///
/// Decoding is all-or-nothing: no partial envelope is ever returned
/// alongside one of these.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON (or is truncated).
    #[error("webhook payload is not valid JSON at line {line}, column {column}: {source}")]
    Syntax {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The payload is JSON but does not have the expected structure
    /// (missing required field, wrong type, …).
    #[error("webhook payload has an invalid structure at line {line}, column {column}: {source}")]
    Structure {
        line: usize,
        column: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Returns `true` if the payload was not valid JSON at all.
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(source: serde_json::Error) -> Self {
        let (line, column) = (source.line(), source.column());
        match source.classify() {
            Category::Data => Self::Structure {
                line,
                column,
                source,
            },
            Category::Syntax | Category::Eof | Category::Io => Self::Syntax {
                line,
                column,
                source,
            },
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for webhook decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_from_body() {
        let body = br#"{
            "error": {
                "message": "Invalid OAuth access token.",
                "type": "OAuthException",
                "code": 190,
                "error_subcode": 460,
                "fbtrace_id": "BLBz/WZt8dN"
            }
        }"#;

        let response = ErrorResponse::from_body(400, body);
        assert_eq!(response.status_code, 400);
        assert_eq!(response.error.message, "Invalid OAuth access token.");
        assert_eq!(response.error.error_type, "OAuthException");
        assert_eq!(response.error.code, 190);
        assert_eq!(response.error.sub_code, 460);
        assert_eq!(response.error.fbtrace_id, "BLBz/WZt8dN");
    }

    #[test]
    fn test_error_response_from_garbage_body() {
        let response = ErrorResponse::from_body(502, b"<html>bad gateway</html>");
        assert_eq!(response.status_code, 502);
        assert_eq!(response.error, ApiErrorBody::default());
    }

    #[test]
    fn test_decode_error_classification() {
        let err: DecodeError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_syntax());

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct NeedsId {
            id: String,
        }

        let err: DecodeError = serde_json::from_str::<NeedsId>("{}").unwrap_err().into();
        assert!(!err.is_syntax());
        assert!(err.to_string().contains("missing field `id`"));
    }
}
