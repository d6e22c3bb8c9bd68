//! Reqwest-based HTTP transport adapter.
//!
//! This module provides the production [`HttpTransport`] implementation.
//! Responses are returned with an unread body stream whatever their status.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::error::classify_reqwest_error;
use crate::traits::{Headers, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// HTTP transport implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use listwatch::adapters::ReqwestHttpClient;
/// use listwatch::traits::{HttpRequest, HttpTransport};
///
/// let client = ReqwestHttpClient::new();
/// let request = HttpRequest::new(reqwest::Method::GET, "http://127.0.0.1:8080/objects");
/// let response = client.execute(request).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    ///
    /// Use this for custom connect timeouts or TLS settings. A whole-request
    /// timeout would also cut off long-lived watches.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest headers to our Headers type.
    ///
    /// Values that are not visible ASCII are skipped; repeated names keep the
    /// last value.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn build(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .build(request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());
        let body = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(e.to_string())
                } else {
                    TransportError::Io(e.to_string())
                }
            })
        });

        Ok(HttpResponse::new(status, headers, Box::pin(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_reqwest_http_client_default() {
        let client = ReqwestHttpClient::default();
        let _ = client.inner();
    }

    #[test]
    fn test_reqwest_http_client_with_custom_client() {
        let custom = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let client = ReqwestHttpClient::with_client(custom);
        let _ = client.inner();
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        header_map.insert(reqwest::header::CONTENT_LENGTH, "100".parse().unwrap());

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(headers.get("content-length"), Some(&"100".to_string()));
    }

    #[tokio::test]
    async fn test_execute_sends_method_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/objects/a"))
            .and(header("x-namespace", "team"))
            .and(body_string("{\"k\":1}"))
            .respond_with(ResponseTemplate::new(200).set_body_string("stored"))
            .expect(1)
            .mount(&server)
            .await;

        let mut request = HttpRequest::new(Method::PUT, format!("{}/objects/a", server.uri()));
        request.add_header("X-Namespace", "team");
        request.body = Some(bytes::Bytes::from_static(b"{\"k\":1}"));

        let response = ReqwestHttpClient::new().execute(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text().await.unwrap(), "stored");
    }

    #[tokio::test]
    async fn test_execute_returns_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let request = HttpRequest::new(Method::GET, format!("{}/objects", server.uri()));
        let response = ReqwestHttpClient::new().execute(request).await.unwrap();
        assert_eq!(response.status, 503);
        assert!(!response.is_success());
        assert_eq!(response.text().await.unwrap(), "busy");
    }

    #[tokio::test]
    async fn test_execute_connection_refused() {
        let request = HttpRequest::new(Method::GET, "http://127.0.0.1:59999/objects");
        let err = ReqwestHttpClient::new().execute(request).await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectionFailed(_)));
    }

    #[tokio::test]
    async fn test_execute_invalid_url() {
        let request = HttpRequest::new(Method::GET, "not a url");
        let err = ReqwestHttpClient::new().execute(request).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
