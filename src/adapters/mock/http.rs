//! Mock HTTP transport for testing.
//!
//! Provides a configurable mock transport that can return predefined
//! responses or errors and records every request it sees.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    /// Header pairs in the order they were set
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl RecordedRequest {
    /// First value of a header, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response with this status and a single-chunk body
    Success(u16, Bytes),
    /// Return a 200 response whose body arrives in these chunks
    Stream(Vec<Bytes>),
    /// Return a 200 response whose body yields these chunks, then fails
    StreamError(Vec<Bytes>, TransportError),
    /// Fail before any response
    Error(TransportError),
}

impl MockResponse {
    /// Shorthand for a JSON or text body.
    pub fn body(status: u16, body: impl Into<Bytes>) -> Self {
        MockResponse::Success(status, body.into())
    }

    fn into_response(self) -> Result<HttpResponse, TransportError> {
        match self {
            MockResponse::Success(status, body) => Ok(HttpResponse::from_bytes(status, body)),
            MockResponse::Stream(chunks) => {
                let items: Vec<Result<Bytes, TransportError>> = chunks.into_iter().map(Ok).collect();
                let body: ByteStream = Box::pin(futures::stream::iter(items));
                Ok(HttpResponse::new(200, Headers::new(), body))
            }
            MockResponse::StreamError(chunks, err) => {
                let mut items: Vec<Result<Bytes, TransportError>> =
                    chunks.into_iter().map(Ok).collect();
                items.push(Err(err));
                let body: ByteStream = Box::pin(futures::stream::iter(items));
                Ok(HttpResponse::new(200, Headers::new(), body))
            }
            MockResponse::Error(err) => Err(err),
        }
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are matched by exact URL, then by URL prefix, then fall back to
/// the default response.
///
/// # Example
///
/// ```ignore
/// use listwatch::adapters::mock::{MockHttpClient, MockResponse};
///
/// let transport = MockHttpClient::new();
/// transport.set_response("http://svc/objects/a", MockResponse::body(200, "{}"));
///
/// let client = ApiClient::with_transport(config, transport.clone());
/// client.get_json::<Resource>("/objects/a").await?;
/// assert_eq!(transport.call_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a specific URL or URL prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests that reached the transport.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, request: &HttpRequest) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: request.method.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        // Longest prefix wins
        let prefixed = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if prefixed.is_some() {
            return prefixed;
        }

        self.default_response.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.record_request(&request);

        match self.get_response(&request.url) {
            Some(response) => response.into_response(),
            None => Err(TransportError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }
}
