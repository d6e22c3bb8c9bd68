//! Transport-level error types.
//!
//! These errors come out of an [`HttpTransport`](crate::traits::HttpTransport)
//! implementation: the request never produced a response, or reading the
//! response body failed partway.

use std::fmt;

/// Failure to complete an HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection to the server failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Request was cancelled
    Cancelled,
    /// Reading or writing the body failed
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl TransportError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed(_) => "E_NET_CONN",
            TransportError::Timeout(_) => "E_NET_TIMEOUT",
            TransportError::Cancelled => "E_NET_CANCEL",
            TransportError::Io(_) => "E_NET_IO",
            TransportError::InvalidUrl(_) => "E_NET_URL",
            TransportError::Other(_) => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            TransportError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            TransportError::Cancelled => write!(f, "Request cancelled"),
            TransportError::Io(msg) => write!(f, "IO error: {}", msg),
            TransportError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            TransportError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Classify a reqwest error into a [`TransportError`].
pub fn classify_reqwest_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::ConnectionFailed(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidUrl(err.to_string())
    } else if err.is_body() || err.is_decode() {
        TransportError::Io(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
