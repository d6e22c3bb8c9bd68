//! List+watch merge engine.
//!
//! [`list_watch`] reads a snapshot of a collection, opens a change
//! subscription at the snapshot's cursor, and spawns one task that writes the
//! snapshot (as `Added` events) followed by the live changes into a single
//! [`WatchStream`].

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use super::types::{ChangeEvent, Selector, WatchEvent};
use crate::error::StoreError;
use crate::handoff::{Outlet, TaskStream};
use crate::traits::{ObjectStore, Subscription};

/// Merged snapshot-then-changes stream.
pub type WatchStream<T> = TaskStream<ChangeEvent<T>>;

/// Start a merged list+watch over `selector`.
///
/// Fails without spawning anything if either the list read or the
/// subscription fails. The returned stream ends when the subscription ends,
/// when `cancel` fires, or when the stream is dropped.
pub async fn list_watch<T, S>(
    store: &S,
    selector: &Selector,
    cancel: &CancellationToken,
    capacity: usize,
) -> Result<WatchStream<T>, StoreError>
where
    T: Send + 'static,
    S: ObjectStore<T> + ?Sized,
{
    let snapshot = store.list(selector).await?;
    let subscription = store.watch(selector, &snapshot.cursor).await?;

    tracing::debug!(
        namespace = %selector.namespace,
        cursor = %snapshot.cursor,
        items = snapshot.items.len(),
        "Starting list+watch"
    );

    Ok(TaskStream::spawn(capacity, cancel, move |outlet| {
        pump(snapshot.items, subscription, outlet)
    }))
}

/// Sole writer of a watch stream.
async fn pump<T>(items: Vec<T>, mut subscription: Subscription<T>, outlet: Outlet<ChangeEvent<T>>) {
    for item in items {
        if !outlet.emit(ChangeEvent::Added(item)).await {
            tracing::debug!("Watch consumer gone during snapshot");
            return;
        }
    }

    loop {
        let next = tokio::select! {
            biased;
            _ = outlet.token().cancelled() => {
                tracing::debug!("Watch cancelled");
                break;
            }
            next = subscription.next() => next,
        };

        let Some(event) = next else {
            tracing::debug!("Watch subscription ended");
            break;
        };

        match event {
            WatchEvent::Bookmark(cursor) => {
                tracing::trace!(%cursor, "Dropping bookmark");
            }
            WatchEvent::Error(message) => {
                tracing::warn!(%message, "Dropping watch error event");
            }
            other => {
                if let Some(change) = other.into_change() {
                    if !outlet.emit(change).await {
                        break;
                    }
                }
            }
        }
    }
    // Dropping the subscription here releases it.
}
