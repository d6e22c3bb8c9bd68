//! HTTP API client.
//!
//! [`ApiClient::send`] builds and sends one request and classifies the
//! response; the JSON helpers and [`ApiClient::watch`] sit on top of it.
//!
//! # Example
//!
//! ```ignore
//! use listwatch::client::ApiClient;
//! use listwatch::config::ClientConfig;
//!
//! let client = ApiClient::new(ClientConfig::from_env());
//! let cancel = CancellationToken::new();
//! let mut events = client
//!     .watch::<ChangeEvent<Resource>>("/objects", &["X-Namespace", "team"], &cancel)
//!     .await?;
//! while let Some(envelope) = events.recv().await {
//!     println!("{:?}", envelope);
//! }
//! ```

pub mod capture;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, HttpStatusError};
use crate::sse::{decode_stream, EnvelopeStream, EVENT_STREAM_MIME};
use crate::traits::{HttpRequest, HttpResponse, HttpTransport};

const JSON_MIME: &str = "application/json";

/// Client for a list/watch HTTP API.
#[derive(Debug, Clone)]
pub struct ApiClient<H = ReqwestHttpClient> {
    transport: H,
    config: ClientConfig,
}

impl ApiClient<ReqwestHttpClient> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestHttpClient::new())
    }
}

impl<H: HttpTransport> ApiClient<H> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: H) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}/{}", self.config.base_url, path)
        }
    }

    /// Send one request.
    ///
    /// `header_kv` is a flat list of alternating header names and values; an
    /// odd length fails before anything is sent. The pairs are appended after
    /// the bearer token, so a caller-supplied value never replaces it.
    /// `wants_stream` appends an event-stream `Accept`. Any status >= 400
    /// becomes [`ClientError::HttpStatus`] carrying the response body, or the
    /// status line when the body is empty or unreadable.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        header_kv: &[&str],
        wants_stream: bool,
    ) -> ClientResult<HttpResponse> {
        if header_kv.len() % 2 != 0 {
            return Err(ClientError::configuration(format!(
                "header key/value list has odd length {}",
                header_kv.len()
            )));
        }

        let mut request = HttpRequest::new(method, self.url(path));
        if let Some(token) = &self.config.token {
            request.add_header("Authorization", format!("Bearer {}", token));
        }
        for pair in header_kv.chunks_exact(2) {
            request.add_header(pair[0], pair[1]);
        }
        if wants_stream {
            request.add_header("Accept", EVENT_STREAM_MIME);
        }
        request.body = body;

        let capture = self.config.debug_capture;
        if capture {
            capture::log_request(&request);
        }

        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            let status = response.status;
            // A body that fails mid-read still yields a status error.
            let text = response.text().await.unwrap_or_else(|e| {
                tracing::debug!(status, error = %e, "failed to read error body");
                String::new()
            });
            if capture {
                tracing::debug!(status, body = %text, "HTTP error response");
            }
            let message = if text.is_empty() { status_line(status) } else { text };
            return Err(HttpStatusError::new(status, message).into());
        }

        if capture && !wants_stream {
            return Ok(capture::replay_response(response).await?);
        }
        Ok(response)
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, header_kv: &[&str]) -> ClientResult<T> {
        let response = self.send(Method::GET, path, None, header_kv, false).await?;
        decode_json(response).await
    }

    /// PUT `body` as JSON and decode the JSON response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B, header_kv: &[&str]) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body, header_kv).await
    }

    /// POST `body` as JSON and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B, header_kv: &[&str]) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body, header_kv).await
    }

    /// DELETE `path`, discarding any response body.
    pub async fn delete(&self, path: &str, header_kv: &[&str]) -> ClientResult<()> {
        self.send(Method::DELETE, path, None, header_kv, false).await?;
        Ok(())
    }

    /// GET `path` as an event stream and decode each frame as `T`.
    ///
    /// Errors before the stream starts (including any status >= 400) are
    /// returned here; everything after arrives in-band as envelopes.
    pub async fn watch<T>(
        &self,
        path: &str,
        header_kv: &[&str],
        cancel: &CancellationToken,
    ) -> ClientResult<EnvelopeStream<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let response = self.send(Method::GET, path, None, header_kv, true).await?;
        Ok(decode_stream(response.body, cancel, self.config.stream_buffer))
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B, header_kv: &[&str]) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| ClientError::Serialize {
            message: e.to_string(),
        })?;
        let mut headers = header_kv.to_vec();
        headers.extend_from_slice(&["Content-Type", JSON_MIME]);

        let response = self
            .send(method, path, Some(Bytes::from(payload)), &headers, false)
            .await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: HttpResponse) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
        message: e.to_string(),
    })
}

/// `"500 Internal Server Error"` style status line.
fn status_line(status: u16) -> String {
    match StatusCode::from_u16(status).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    }
}
