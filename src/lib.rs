//! listwatch - list/watch over Server-Sent Events
//!
//! A snapshot of a collection followed by its live changes, merged into one
//! ordered stream on the server, framed as `data: <json>` events, and decoded
//! back into typed values on the client.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod handoff;
pub mod models;
pub mod prelude;
pub mod server;
pub mod sse;
pub mod traits;
pub mod watch;
