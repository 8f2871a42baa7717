//! Connector error types.

use std::io;
use thiserror::Error;

/// Errors raised while connecting to or reading an event stream.
#[derive(Debug, Error)]
pub enum SseError {
    /// The response is not an event stream. Raised before any decoding.
    #[error("Expected response header Content-Type to contain 'text/event-stream', got '{content_type}'")]
    ContentType {
        /// The Content-Type the server sent, empty if absent.
        content_type: String,
    },

    /// Transport error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error while reading a blocking response body.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON decoding of an event payload failed.
    ///
    /// The connector never raises this itself. It lets callers apply `?` to
    /// [`ServerSentEvent::json`](serdes_sse_core::ServerSentEvent::json)
    /// inside functions returning [`SseResult`].
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured request header is not valid.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl SseError {
    /// Create a content-type mismatch error.
    pub fn content_type(content_type: impl Into<String>) -> Self {
        Self::ContentType {
            content_type: content_type.into(),
        }
    }

    /// Check if a reconnect could plausibly succeed.
    ///
    /// True for dropped connections and timeouts. A wrong content type or a
    /// bad payload will fail the same way again.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_body() || e.is_request(),
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::Interrupted
            ),
            Self::ContentType { .. } | Self::Json(_) | Self::InvalidHeader(_) => false,
        }
    }
}

/// Result type for connector operations.
pub type SseResult<T> = Result<T, SseError>;
