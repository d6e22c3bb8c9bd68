//! Error types for listwatch.
//!
//! - **Categories**: [`ErrorCategory`] for retry and reporting decisions
//! - **Client errors**: [`ClientError`], returned by every API call, with
//!   [`HttpStatusError`] for responses with status >= 400
//! - **Transport errors**: [`TransportError`], raised by HTTP adapters
//! - **Store errors**: [`StoreError`], raised by object stores
//!
//! Frame decode failures are not errors at this level: they are delivered
//! in-band as [`Envelope::DecodeError`](crate::envelope::Envelope::DecodeError).
//!
//! | Error | Category | Retryable |
//! |-------|----------|-----------|
//! | Configuration | Configuration | No |
//! | Transport | Network | Yes (except cancel) |
//! | HttpStatus 401/403 | Auth | No |
//! | HttpStatus 5xx | Server | Yes |
//! | HttpStatus other 4xx | Client | No (except 408/429) |

mod category;
mod client;
mod store;
mod transport;

pub use category::ErrorCategory;
pub use client::{ClientError, HttpStatusError};
pub use store::StoreError;
pub use transport::{classify_reqwest_error, TransportError};

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
