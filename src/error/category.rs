//! Error category classification.
//!
//! Categories give callers one place to decide whether a failed list, get or
//! watch call is worth retrying, without matching on every error variant.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout or body read failures.
    Network,

    /// The server rejected the credentials (401/403).
    Auth,

    /// The server failed (5xx) or answered with something undecodable.
    Server,

    /// The server rejected the request itself (4xx other than auth).
    Client,

    /// Malformed caller input detected before any I/O.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Suggested recovery action for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the server is reachable and try again",
            ErrorCategory::Auth => "Check the configured bearer token",
            ErrorCategory::Server => "The server may be experiencing issues. Please try again later",
            ErrorCategory::Client => "Check the request path and payload",
            ErrorCategory::Configuration => "Fix the request arguments; retrying will not help",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(format!("{}", ErrorCategory::Configuration), "configuration");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Auth.recovery_hint().contains("token"));
        assert!(ErrorCategory::Server.recovery_hint().contains("try again"));
    }
}
