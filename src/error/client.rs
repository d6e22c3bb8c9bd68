//! Errors surfaced by [`ApiClient`](crate::client::ApiClient).

use std::fmt;

use super::{ErrorCategory, TransportError};

/// Status code (404, 409) used by the convenience predicates.
const NOT_FOUND: u16 = 404;
const CONFLICT: u16 = 409;

/// A response with status >= 400.
///
/// `message` is the response body text, or the status line when the body
/// was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    pub code: u16,
    pub message: String,
}

impl HttpStatusError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A 400 error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(400, message)
    }

    /// A 404 error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NOT_FOUND, message)
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} error: {}", self.code, self.message)
    }
}

impl std::error::Error for HttpStatusError {}

/// Client-facing error for every API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Malformed caller input, detected before any I/O.
    Configuration { message: String },

    /// The request could not be completed.
    Transport(TransportError),

    /// The request body could not be encoded as JSON.
    Serialize { message: String },

    /// The server answered with a status >= 400.
    HttpStatus(HttpStatusError),

    /// A whole-body response could not be decoded.
    Decode { message: String },
}

impl ClientError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ClientError::Configuration {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Configuration { .. } => ErrorCategory::Configuration,
            ClientError::Transport(_) => ErrorCategory::Network,
            ClientError::Serialize { .. } => ErrorCategory::Configuration,
            ClientError::HttpStatus(err) => match err.code {
                401 | 403 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            ClientError::Decode { .. } => ErrorCategory::Server,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::HttpStatus(err) => {
                err.code >= 500 || err.code == 429 || err.code == 408
            }
            ClientError::Transport(TransportError::Cancelled) => false,
            other => other.category().is_retryable(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Configuration { .. } => "E_CONFIG",
            ClientError::Transport(err) => err.error_code(),
            ClientError::Serialize { .. } => "E_ENCODE",
            ClientError::HttpStatus(_) => "E_NET_HTTP",
            ClientError::Decode { .. } => "E_DECODE",
        }
    }

    /// The status code, if the server answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus(err) => Some(err.code),
            _ => None,
        }
    }

    pub fn is_http_code(&self, code: u16) -> bool {
        self.status_code() == Some(code)
    }

    pub fn is_not_found(&self) -> bool {
        self.is_http_code(NOT_FOUND)
    }

    pub fn is_conflict(&self) -> bool {
        self.is_http_code(CONFLICT)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Configuration { message } => {
                write!(f, "Invalid request configuration: {}", message)
            }
            ClientError::Transport(err) => write!(f, "{}", err),
            ClientError::Serialize { message } => {
                write!(f, "Failed to encode request body: {}", message)
            }
            ClientError::HttpStatus(err) => write!(f, "{}", err),
            ClientError::Decode { message } => {
                write!(f, "Failed to decode response: {}", message)
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Transport(err) => Some(err),
            ClientError::HttpStatus(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        ClientError::Transport(err)
    }
}

impl From<HttpStatusError> for ClientError {
    fn from(err: HttpStatusError) -> Self {
        ClientError::HttpStatus(err)
    }
}
