//! Consumer-side frame decoding.
//!
//! Lines are split out of the byte stream as they arrive. Only lines that
//! start with the exact `data: ` prefix carry a payload; every other line
//! (blank separators, `event:`, `id:`, comments) is ignored.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::DATA_PREFIX;
use crate::envelope::Envelope;
use crate::handoff::{Outlet, TaskStream};

/// Decoded event stream.
pub type EnvelopeStream<T> = TaskStream<Envelope<T>>;

/// Splits a chunked byte stream into lines.
///
/// Lines end at `\n`; a trailing `\r` is dropped. Bytes are buffered until a
/// full line is available, so a UTF-8 sequence split across chunks decodes
/// correctly.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            lines.push(to_line(&self.buffer[start..end]));
            start = end + 1;
        }
        self.buffer.drain(..start);
        lines
    }

    /// The unterminated tail left when the stream ends, if any.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = to_line(&self.buffer);
        self.buffer.clear();
        Some(line)
    }
}

fn to_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}

/// Decode one line.
///
/// Returns `None` for lines without the `data: ` prefix.
pub fn decode_line<T: DeserializeOwned>(line: &str) -> Option<Envelope<T>> {
    let data = line.strip_prefix(DATA_PREFIX)?;
    tracing::debug!(data, "Received data");
    Some(match serde_json::from_str(data) {
        Ok(value) => Envelope::Ok(value),
        Err(e) => Envelope::DecodeError(e.to_string()),
    })
}

/// Decode a byte stream into typed envelopes on a background task.
///
/// The task owns `body` and drops it exactly once: at end of stream, after a
/// read error (reported as a final [`Envelope::Interrupted`]), on
/// cancellation, or when the returned stream is dropped.
pub fn decode_stream<T, S, E>(body: S, cancel: &CancellationToken, capacity: usize) -> EnvelopeStream<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Stream<Item = Result<Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    TaskStream::spawn(capacity, cancel, move |outlet| read_frames(body, outlet))
}

async fn read_frames<T, S, E>(mut body: S, outlet: Outlet<Envelope<T>>)
where
    T: DeserializeOwned,
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut splitter = LineSplitter::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = outlet.token().cancelled() => {
                tracing::debug!("Frame decoder cancelled");
                return;
            }
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                for line in splitter.push(&chunk) {
                    if let Some(envelope) = decode_line(&line) {
                        if !outlet.emit(envelope).await {
                            return;
                        }
                    }
                }
            }
            Some(Err(e)) => {
                tracing::debug!(error = %e, "Event stream read failed");
                outlet.emit(Envelope::Interrupted(e.to_string())).await;
                return;
            }
            None => {
                if let Some(envelope) = splitter.finish().and_then(|line| decode_line(&line)) {
                    outlet.emit(envelope).await;
                }
                tracing::debug!("Event stream ended");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Point {
        x: i32,
    }

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<Bytes, String>> + Send + Unpin {
        futures::stream::iter(
            parts
                .iter()
                .map(|&p| Ok(Bytes::from(p)))
                .collect::<Vec<Result<Bytes, String>>>(),
        )
    }

    #[test]
    fn test_splitter_handles_partial_lines_and_crlf() {
        let mut splitter = LineSplitter::new();
        assert!(splitter.push(b"data: {\"x\"").is_empty());
        assert_eq!(splitter.push(b":1}\r\n\r\nev"), vec!["data: {\"x\":1}", ""]);
        assert_eq!(splitter.push(b"ent: ping\n"), vec!["event: ping"]);
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_splitter_joins_split_utf8() {
        let snowman = "\u{2603}".as_bytes();
        let mut splitter = LineSplitter::new();
        assert!(splitter.push(&snowman[..1]).is_empty());
        let mut rest = snowman[1..].to_vec();
        rest.push(b'\n');
        assert_eq!(splitter.push(&rest), vec!["\u{2603}"]);
    }

    #[test]
    fn test_splitter_finish_returns_tail() {
        let mut splitter = LineSplitter::new();
        splitter.push(b"data: 1");
        assert_eq!(splitter.finish(), Some("data: 1".to_string()));
        assert_eq!(splitter.finish(), None);
    }

    #[test]
    fn test_decode_line_rules() {
        assert_eq!(decode_line::<Point>("data: {\"x\":1}"), Some(Envelope::Ok(Point { x: 1 })));
        assert!(matches!(
            decode_line::<Point>("data: not-json"),
            Some(Envelope::DecodeError(_))
        ));
        assert_eq!(decode_line::<Point>("event: ping"), None);
        assert_eq!(decode_line::<Point>(""), None);
        // Prefix must match exactly, including the space.
        assert_eq!(decode_line::<Point>("data:{\"x\":1}"), None);
    }

    #[tokio::test]
    async fn test_decode_stream_valid_frame() {
        let cancel = CancellationToken::new();
        let stream = decode_stream::<Point, _, _>(chunks(&["data: {\"x\":1}\n\n"]), &cancel, 4);
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items, vec![Envelope::Ok(Point { x: 1 })]);
    }

    #[tokio::test]
    async fn test_decode_stream_recovers_after_bad_frame() {
        let cancel = CancellationToken::new();
        let stream = decode_stream::<Point, _, _>(
            chunks(&["data: not-json\n\n", "event: ping\n", "data: {\"x\":2}\n\n"]),
            &cancel,
            4,
        );
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0], Envelope::DecodeError(_)));
        assert_eq!(items[1], Envelope::Ok(Point { x: 2 }));
    }

    #[tokio::test]
    async fn test_decode_stream_non_data_lines_emit_nothing() {
        let cancel = CancellationToken::new();
        let stream = decode_stream::<Point, _, _>(
            chunks(&["event: ping\n", ": comment\n", "id: 4\n", "\n"]),
            &cancel,
            4,
        );
        let items: Vec<_> = stream.collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_decode_stream_processes_unterminated_tail() {
        let cancel = CancellationToken::new();
        let stream = decode_stream::<Point, _, _>(chunks(&["data: {\"x\":3}"]), &cancel, 4);
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items, vec![Envelope::Ok(Point { x: 3 })]);
    }

    #[tokio::test]
    async fn test_decode_stream_read_error_is_last_item() {
        let cancel = CancellationToken::new();
        let body = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"data: {\"x\":1}\n\n")),
            Err("connection reset".to_string()),
            Ok(Bytes::from_static(b"data: {\"x\":2}\n\n")),
        ]);
        let items: Vec<_> = decode_stream::<Point, _, _>(body, &cancel, 4).collect().await;
        assert_eq!(
            items,
            vec![
                Envelope::Ok(Point { x: 1 }),
                Envelope::Interrupted("connection reset".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_decode_stream_cancel_unblocks_pending_read() {
        let cancel = CancellationToken::new();
        let body = futures::stream::pending::<Result<Bytes, String>>();
        let mut stream = decode_stream::<Point, _, _>(body, &cancel, 4);

        cancel.cancel();
        let next = tokio::time::timeout(Duration::from_secs(1), stream.recv())
            .await
            .expect("stream should close after cancel");
        assert_eq!(next, None);
    }
}
