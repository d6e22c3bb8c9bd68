//! HTTP transport trait abstraction.
//!
//! Provides a trait-based abstraction for sending one HTTP request and
//! getting back a response whose body is read incrementally. The same
//! response type serves whole-body JSON decoding and event streams.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::Method;

pub use crate::error::TransportError;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// Response body as a stream of chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// A fully built request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Header pairs in insertion order; a name may repeat.
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header. Existing values for the same name are kept.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// All values for a header, case-insensitive.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// HTTP response with a streaming body.
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body, read at most once
    pub body: ByteStream,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Headers, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A response whose body is already in memory.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, Headers::new(), replay_body(body.into()))
    }

    /// Check if the response indicates success (status < 400).
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// Read the whole body.
    pub async fn bytes(self) -> Result<Bytes, TransportError> {
        collect_body(self.body).await
    }

    /// Read the whole body as text; invalid UTF-8 is replaced.
    pub async fn text(self) -> Result<String, TransportError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Drain a body stream into one buffer.
pub async fn collect_body(mut body: ByteStream) -> Result<Bytes, TransportError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = body.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}

/// A body that yields `bytes` once.
pub fn replay_body(bytes: Bytes) -> ByteStream {
    if bytes.is_empty() {
        Box::pin(futures::stream::empty::<Result<Bytes, TransportError>>())
    } else {
        Box::pin(futures::stream::once(async move {
            Ok::<_, TransportError>(bytes)
        }))
    }
}

/// Trait for sending HTTP requests.
///
/// Implementations return every response, whatever its status; status
/// classification belongs to the caller. Implementations include the
/// reqwest-based adapter and a recording mock for tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request` and return the response head with an unread body.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
