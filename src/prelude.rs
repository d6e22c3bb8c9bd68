//! Prelude module for convenient imports.
//!
//! ```ignore
//! use listwatch::prelude::*;
//! ```

// Client side
pub use crate::client::ApiClient;
pub use crate::config::{ClientConfig, ServerConfig};
pub use crate::envelope::Envelope;
pub use crate::sse::EnvelopeStream;

// Merge engine
pub use crate::traits::{ObjectStore, Subscription};
pub use crate::watch::{list_watch, ChangeEvent, Cursor, Selector, Snapshot, WatchEvent, WatchStream};

// Models and stores
pub use crate::adapters::MemoryStore;
pub use crate::models::{Resource, ResourceList};

// Errors
pub use crate::error::{ClientError, ClientResult, HttpStatusError, StoreError};
