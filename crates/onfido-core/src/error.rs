//! Error types module
//!
//! All failures surfaced by the client are unified under [`OnfidoError`]. The
//! variants follow the order in which a call can fail: encoding the request
//! body, building the request, moving it over the wire, and finally
//! interpreting the response.

use std::io;

use serde::{Deserialize, Serialize};

pub type Result<T, E = OnfidoError> = std::result::Result<T, E>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how a caller may react to an error.
/// The client itself never retries; this is what a retry policy would key on.
pub trait ErrorMetadata {
    /// HTTP status code returned by the API, if the request got that far
    fn status_code(&self) -> Option<u16>;

    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same call could succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// Error payload returned by the API on non-success responses:
/// `{"error": {"type": "...", "message": "...", "fields": {...}}}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub fields: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

impl ApiErrorDetail {
    /// Parse the API error envelope. Returns `None` for bodies in any other shape.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ApiErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OnfidoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Multipart encoding error: {0}")]
    Encoding(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("API request failed with status {status}: {body}")]
    Api {
        status: u16,
        body: String,
        detail: Option<ApiErrorDetail>,
    },

    #[error("Failed to parse response as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OnfidoError {
    /// Build an `Api` error from a raw response body, parsing the error envelope when present.
    pub fn api(status: u16, body: &[u8]) -> Self {
        OnfidoError::Api {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
            detail: ApiErrorDetail::from_body(body),
        }
    }

    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        OnfidoError::Transport(Box::new(err))
    }

    /// Message reported by the API, if the error body carried one.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            OnfidoError::Api {
                detail: Some(detail),
                ..
            } => detail.message.as_deref(),
            _ => None,
        }
    }
}

impl ErrorMetadata for OnfidoError {
    fn status_code(&self) -> Option<u16> {
        match self {
            OnfidoError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            OnfidoError::Io(_) => "IO_ERROR",
            OnfidoError::Encoding(_) => "ENCODING_ERROR",
            OnfidoError::InvalidRequest(_) => "INVALID_REQUEST",
            OnfidoError::Transport(_) => "TRANSPORT_ERROR",
            OnfidoError::Api { status, .. } => match status {
                401 | 403 => "UNAUTHORIZED",
                404 => "NOT_FOUND",
                422 => "VALIDATION_ERROR",
                429 => "RATE_LIMITED",
                500..=599 => "SERVER_ERROR",
                _ => "API_ERROR",
            },
            OnfidoError::Decode(_) => "DECODE_ERROR",
            OnfidoError::Cancelled => "CANCELLED",
            OnfidoError::Config(_) => "CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            OnfidoError::Transport(_) => true,
            OnfidoError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            OnfidoError::Cancelled | OnfidoError::InvalidRequest(_) => LogLevel::Debug,
            OnfidoError::Api { status, .. } if *status < 500 => LogLevel::Debug,
            OnfidoError::Transport(_) | OnfidoError::Api { .. } => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
