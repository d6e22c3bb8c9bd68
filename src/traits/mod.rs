//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpTransport`] - send one HTTP request, stream the response body
//! - [`ObjectStore`] - list/watch capability of an external object store

pub mod http;
pub mod store;

pub use http::{
    collect_body, replay_body, ByteStream, Headers, HttpRequest, HttpResponse, HttpTransport,
    TransportError,
};
pub use store::{ObjectStore, Subscription};
