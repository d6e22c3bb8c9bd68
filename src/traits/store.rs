//! Object store capability.
//!
//! The store itself (persistence, how change events are computed, how
//! cursors are assigned) lives outside this crate. Anything that can list a
//! collection with a cursor and subscribe to changes after that cursor can
//! drive [`list_watch`](crate::watch::list_watch).

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::StoreError;
use crate::watch::{Cursor, Selector, Snapshot, WatchEvent};

/// A live change subscription. Dropping it releases the subscription.
pub type Subscription<T> = Pin<Box<dyn Stream<Item = WatchEvent<T>> + Send>>;

/// Trait for object store operations.
///
/// # Contract
///
/// `watch(selector, cursor)` must deliver every change after `cursor` exactly
/// once, in order, and nothing at or before it. `list` and `watch` are the
/// operations the merge engine needs; `get`, `put` and `delete` back the
/// HTTP surface.
#[async_trait]
pub trait ObjectStore<T>: Send + Sync {
    /// Point-in-time read of a collection.
    async fn list(&self, selector: &Selector) -> Result<Snapshot<T>, StoreError>;

    /// Subscribe to changes strictly after `from`.
    async fn watch(&self, selector: &Selector, from: &Cursor) -> Result<Subscription<T>, StoreError>;

    /// Read one object.
    async fn get(&self, selector: &Selector, name: &str) -> Result<T, StoreError>;

    /// Create or replace one object, returning it as stored.
    async fn put(&self, selector: &Selector, name: &str, obj: T) -> Result<T, StoreError>;

    /// Remove one object, returning its last state.
    async fn delete(&self, selector: &Selector, name: &str) -> Result<T, StoreError>;
}
