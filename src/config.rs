//! Client and server configuration.
//!
//! Both configs use the builder pattern and can be seeded from environment
//! variables.
//!
//! # Example
//!
//! ```ignore
//! use listwatch::config::ClientConfig;
//!
//! let config = ClientConfig::from_env()
//!     .with_token("secret")
//!     .with_debug_capture(true);
//! ```

use std::net::SocketAddr;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Queue slots between a background task and its consumer.
pub const DEFAULT_STREAM_BUFFER: usize = 16;

/// Largest request body the server reads (1 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 1 << 20;

/// Changes retained by the in-memory store for resuming watches.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

pub const ENV_URL: &str = "LISTWATCH_URL";
pub const ENV_TOKEN: &str = "LISTWATCH_TOKEN";
pub const ENV_DEBUG: &str = "LISTWATCH_DEBUG";
pub const ENV_ADDR: &str = "LISTWATCH_ADDR";

/// Configuration for [`ApiClient`](crate::client::ApiClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Bearer token attached to every request, if set
    pub token: Option<String>,
    /// Buffer and log request/response bodies at debug level
    pub debug_capture: bool,
    /// Queue slots for decoded event streams
    pub stream_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            debug_capture: false,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn with_debug_capture(mut self, enabled: bool) -> Self {
        self.debug_capture = enabled;
        self
    }

    pub fn with_stream_buffer(mut self, slots: usize) -> Self {
        self.stream_buffer = slots.max(1);
        self
    }

    /// Read `LISTWATCH_URL`, `LISTWATCH_TOKEN` and `LISTWATCH_DEBUG`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_URL) {
            config = config.with_base_url(url);
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            config = config.with_token(token);
        }
        config.debug_capture = env_flag(ENV_DEBUG);
        config
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address
    pub addr: SocketAddr,
    /// Queue slots per watch stream
    pub watch_buffer: usize,
    /// Request body limit in bytes
    pub body_limit: usize,
    /// Change history retained by the in-memory store
    pub history_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            watch_buffer: DEFAULT_STREAM_BUFFER,
            body_limit: DEFAULT_BODY_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_watch_buffer(mut self, slots: usize) -> Self {
        self.watch_buffer = slots.max(1);
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn with_history_limit(mut self, changes: usize) -> Self {
        self.history_limit = changes.max(1);
        self
    }

    /// Read `LISTWATCH_ADDR`. An unparsable address is ignored with a warning.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(ENV_ADDR) {
            Ok(raw) => match raw.parse() {
                Ok(addr) => config.with_addr(addr),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring invalid {}", ENV_ADDR);
                    config
                }
            },
            Err(_) => config,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
