//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`MemoryStore`] - in-memory object store with resumable watches
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - configurable HTTP responses

pub mod memory_store;
pub mod mock;
pub mod reqwest_http;

pub use memory_store::MemoryStore;
pub use mock::MockHttpClient;
pub use reqwest_http::ReqwestHttpClient;
