//! SSE (Server-Sent Events) frame codec.
//!
//! Each value travels as one frame:
//!
//! ```text
//! data: {"type":"ADDED","object":{...}}
//!
//! ```
//!
//! i.e. the 6-byte prefix `data: `, compact JSON, and `\n\n`. Lines that do
//! not start with `data: ` are valid SSE framing but carry no payload here.
//!
//! # Module structure
//! - `encode` - producer side ([`encode_frame`], [`FrameWriter`], [`write_frames`])
//! - `decode` - consumer side ([`LineSplitter`], [`decode_line`], [`decode_stream`])

mod decode;
mod encode;

pub use decode::{decode_line, decode_stream, EnvelopeStream, LineSplitter};
pub use encode::{encode_frame, write_frames, FrameError, FrameWriter};

/// Prefix of every payload line.
pub const DATA_PREFIX: &str = "data: ";

/// Terminates a frame: end of the data line plus one blank line.
pub const FRAME_TERMINATOR: &str = "\n\n";

/// Media type that selects frame encoding.
pub const EVENT_STREAM_MIME: &str = "text/event-stream";
