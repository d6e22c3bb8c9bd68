//! List+watch over an object store.
//!
//! - `types` - selectors, cursors, snapshots and change events
//! - `engine` - the merge engine producing a [`WatchStream`]

mod engine;
mod types;

pub use engine::{list_watch, WatchStream};
pub use types::{ChangeEvent, Cursor, Selector, Snapshot, WatchEvent};
