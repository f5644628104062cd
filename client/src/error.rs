//! Error types for the seismic job client.
//!
//! Errors are grouped by the operation that raises them:
//!
//! - [`ValidationError`] - A candidate batch or upload form was rejected locally
//! - [`TransportError`] - The request never produced an HTTP response
//! - [`ServerError`] - The job server answered with a non-success status
//! - [`PollError`] - Anything that ends a polling run early
//! - [`ClientError`] - Top-level error for upload, download and cleanup
//!
//! Validation errors are not fatal: they are collected into a list and shown
//! to the user. Every other kind terminates only the operation that raised it.

use thiserror::Error;

/// Message used when a failed response carries no readable error text.
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown error";

// =============================================================================
// Validation Errors
// =============================================================================

/// A single reason a batch (or upload form) was rejected before upload.
///
/// The `Display` output is the exact line shown in the error list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Extension not in the whitelist.
    #[error("{name}: invalid extension")]
    InvalidExtension { name: String },

    /// A single file exceeds the per-file limit.
    #[error("{name}: file too large")]
    FileTooLarge { name: String },

    /// The accepted files together exceed the aggregate limit.
    #[error("total size of {total} bytes exceeds the {max} byte limit")]
    TotalTooLarge { total: u64, max: u64 },

    /// Window length outside the accepted range or not an integer.
    #[error("{0}")]
    InvalidWindowLength(String),

    /// The batch is empty where at least one file is required.
    #[error("no files selected")]
    NoFiles,
}

// =============================================================================
// Transport / Server Errors
// =============================================================================

/// Network failure: no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Connection error: {0}")]
pub struct TransportError(pub String);

/// Non-success HTTP status from the job server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Server error ({status}): {message}")]
pub struct ServerError {
    /// HTTP status code.
    pub status: u16,
    /// Text from the body's `error` field, or [`UNKNOWN_SERVER_ERROR`].
    pub message: String,
}

impl ServerError {
    /// Build from a status and the raw response body.
    pub fn from_body(status: u16, body: &str) -> Self {
        Self {
            status,
            message: server_error_message(body),
        }
    }
}

/// Extract the user-facing message from an error response body.
///
/// The server answers failures with `{"error": "<text>"}`. Anything else
/// (empty body, HTML, non-string field) falls back to [`UNKNOWN_SERVER_ERROR`].
pub fn server_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_string))
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_SERVER_ERROR.to_string())
}

// =============================================================================
// Polling Errors
// =============================================================================

/// Reasons a polling run ends in the `Failed` state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PollError {
    /// Status request failed at the network level.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Status endpoint answered with a non-success status.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Status body could not be decoded.
    #[error("Invalid status response: {0}")]
    Decode(String),
}

impl PollError {
    /// Message for the notification channel.
    pub fn user_message(&self) -> String {
        match self {
            PollError::Transport(_) => "Connection error".to_string(),
            PollError::Server(e) => e.message.clone(),
            PollError::Decode(msg) => format!("Invalid status response: {}", msg),
        }
    }
}

// =============================================================================
// Top-level Client Errors
// =============================================================================

/// Errors from upload, download and cleanup operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The batch was rejected before upload; every reason is listed.
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// Network failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-success status.
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Polling ended in failure.
    #[error(transparent)]
    Poll(#[from] PollError),

    /// Response body could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Writing a download to disk failed.
    #[error("Failed to write download: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Validation(vec![err])
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for polling operations.
pub type PollResult<T> = Result<T, PollError>;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::InvalidExtension { name: "b.txt".into() };
        assert_eq!(err.to_string(), "b.txt: invalid extension");

        let err = ValidationError::FileTooLarge { name: "big.mseed".into() };
        assert_eq!(err.to_string(), "big.mseed: file too large");
    }

    #[test]
    fn test_server_error_message_from_body() {
        assert_eq!(server_error_message(r#"{"error": "Job not found"}"#), "Job not found");
        assert_eq!(server_error_message("<html>502</html>"), UNKNOWN_SERVER_ERROR);
        assert_eq!(server_error_message(""), UNKNOWN_SERVER_ERROR);
        // The server flags failed jobs with a boolean
        assert_eq!(server_error_message(r#"{"error": true}"#), UNKNOWN_SERVER_ERROR);
    }

    #[test]
    fn test_error_conversion_chain() {
        let server = ServerError::from_body(404, r#"{"error": "Job not found"}"#);
        let poll: PollError = server.into();
        assert_eq!(poll.user_message(), "Job not found");

        let client: ClientError = poll.into();
        assert!(client.to_string().contains("404"));

        let client: ClientError = ValidationError::NoFiles.into();
        assert!(matches!(client, ClientError::Validation(ref v) if v.len() == 1));
    }

    #[test]
    fn test_transport_user_message() {
        let err = PollError::from(TransportError("connection refused".into()));
        assert_eq!(err.user_message(), "Connection error");
        assert!(err.to_string().contains("connection refused"));
    }
}
