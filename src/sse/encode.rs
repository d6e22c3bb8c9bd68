//! Producer-side frame encoding.

use bytes::{BufMut, Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{DATA_PREFIX, FRAME_TERMINATOR};

/// Failure to emit a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("failed to encode frame payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode `value` as one complete frame: `data: <json>\n\n`.
///
/// Compact JSON never contains a raw newline, so the frame is always a
/// single `data:` line followed by a blank line.
pub fn encode_frame<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    let mut buf = BytesMut::with_capacity(DATA_PREFIX.len() + json.len() + FRAME_TERMINATOR.len());
    buf.put_slice(DATA_PREFIX.as_bytes());
    buf.put_slice(&json);
    buf.put_slice(FRAME_TERMINATOR.as_bytes());
    Ok(buf.freeze())
}

/// Writes frames to an async writer, flushing after every frame.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one frame and flush it through any buffering underneath.
    pub async fn emit<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), FrameError> {
        let frame = encode_frame(value)?;
        self.inner.write_all(&frame).await?;
        self.inner.flush().await?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Emit every value of `values` through a [`FrameWriter`] on `writer`.
///
/// Values that fail to serialize are logged and skipped so one bad object
/// does not end the stream. Returns when `values` ends, or with the first
/// write error (typically the reader went away).
pub async fn write_frames<S, T, W>(values: S, writer: W) -> std::io::Result<()>
where
    S: Stream<Item = T>,
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let mut frames = FrameWriter::new(writer);
    futures::pin_mut!(values);
    while let Some(value) = values.next().await {
        match frames.emit(&value).await {
            Ok(()) => {}
            Err(FrameError::Encode(e)) => {
                tracing::warn!(error = %e, "Skipping frame that failed to encode");
            }
            Err(FrameError::Io(e)) => return Err(e),
        }
    }
    Ok(())
}
