//! Debug capture of request and response bodies.
//!
//! Whole bodies are buffered, logged, and handed back as a replay stream so
//! the caller still reads them exactly once. Event streams never pass
//! through here.

use crate::traits::{collect_body, replay_body, HttpRequest, HttpResponse, TransportError};

/// Render a body for logging. Non-UTF-8 content is summarized by length.
pub fn render_payload(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => format!("[BINARY DATA len({})]", bytes.len()),
    }
}

/// Render headers as `name=value, ` pairs. Credentials are masked.
pub fn render_headers(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                format!("{}=<redacted>", name)
            } else {
                format!("{}={}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn log_request(request: &HttpRequest) {
    let body = request
        .body
        .as_deref()
        .map(render_payload)
        .unwrap_or_default();
    tracing::debug!(
        method = %request.method,
        url = %request.url,
        headers = %render_headers(&request.headers),
        body = %body,
        "HTTP request"
    );
}

/// Buffer and log a whole response body, then re-present it.
pub async fn replay_response(response: HttpResponse) -> Result<HttpResponse, TransportError> {
    let HttpResponse {
        status,
        headers,
        body,
    } = response;
    let bytes = collect_body(body).await?;
    tracing::debug!(status, body = %render_payload(&bytes), "HTTP response");
    Ok(HttpResponse::new(status, headers, replay_body(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_render_payload() {
        assert_eq!(render_payload(b"{\"a\":1}"), "{\"a\":1}");
        assert_eq!(render_payload(&[0xff, 0xfe, 0x00]), "[BINARY DATA len(3)]");
        assert_eq!(render_payload(b""), "");
    }

    #[test]
    fn test_render_headers_masks_authorization() {
        let headers = vec![
            ("Authorization".to_string(), "Bearer secret".to_string()),
            ("X-Namespace".to_string(), "team".to_string()),
        ];
        assert_eq!(
            render_headers(&headers),
            "Authorization=<redacted>, X-Namespace=team"
        );
    }

    #[tokio::test]
    async fn test_replay_response_preserves_body() {
        let chunks: Vec<Result<Bytes, TransportError>> =
            vec![Ok(Bytes::from("{\"na")), Ok(Bytes::from("me\":\"a\"}"))];
        let response = HttpResponse::new(200, Default::default(), Box::pin(futures::stream::iter(chunks)));

        let replayed = replay_response(response).await.unwrap();
        assert_eq!(replayed.status, 200);
        assert_eq!(replayed.text().await.unwrap(), "{\"name\":\"a\"}");
    }

    #[tokio::test]
    async fn test_replay_response_propagates_read_error() {
        let chunks: Vec<Result<Bytes, TransportError>> =
            vec![Err(TransportError::Io("reset".to_string()))];
        let response = HttpResponse::new(200, Default::default(), Box::pin(futures::stream::iter(chunks)));
        assert!(replay_response(response).await.is_err());
    }
}
