//! Mock transport fixtures.
//!
//! Re-exports the mocks from `listwatch::adapters::mock` and adds a builder
//! for the common response setups.

pub use listwatch::adapters::mock::{MockHttpClient, MockResponse, RecordedRequest};

use bytes::Bytes;
use listwatch::client::ApiClient;
use listwatch::config::ClientConfig;

pub const MOCK_BASE: &str = "http://mock.local";

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a whole-body response for a path.
    pub fn with_response(self, path: &str, status: u16, body: &str) -> Self {
        self.client
            .set_response(&format!("{}{}", MOCK_BASE, path), MockResponse::body(status, body.to_string()));
        self
    }

    /// Configures an event stream delivered in `chunks`.
    pub fn with_stream(self, path: &str, chunks: &[&str]) -> Self {
        let chunks = chunks.iter().map(|c| Bytes::from(c.to_string())).collect();
        self.client
            .set_response(&format!("{}{}", MOCK_BASE, path), MockResponse::Stream(chunks));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// An API client over `transport` rooted at [`MOCK_BASE`].
pub fn mock_client(transport: &MockHttpClient) -> ApiClient<MockHttpClient> {
    ApiClient::with_transport(ClientConfig::new(MOCK_BASE), transport.clone())
}
