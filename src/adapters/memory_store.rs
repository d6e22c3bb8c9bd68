//! In-memory object store.
//!
//! A reference implementation of [`ObjectStore`] for tests and the demo
//! server. Every change bumps a single integer version that is stamped into
//! the object and recorded in a bounded history, so a watch can resume from
//! any cursor the history still covers.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::broadcast;

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::error::StoreError;
use crate::models::{Stamp, Stamped};
use crate::traits::{ObjectStore, Subscription};
use crate::watch::{ChangeEvent, Cursor, Selector, Snapshot, WatchEvent};

/// One recorded change.
#[derive(Debug, Clone)]
struct Change<T> {
    version: u64,
    namespace: String,
    event: ChangeEvent<T>,
}

#[derive(Debug)]
struct Entry<T> {
    object: T,
    uid: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Inner<T> {
    version: u64,
    /// Version of the newest change evicted from `history`.
    compacted: u64,
    objects: BTreeMap<(String, String), Entry<T>>,
    history: VecDeque<Change<T>>,
}

/// Thread-safe in-memory store with resumable watches.
#[derive(Debug)]
pub struct MemoryStore<T> {
    inner: Mutex<Inner<T>>,
    live: broadcast::Sender<Change<T>>,
    history_limit: usize,
    kind: String,
}

impl<T: Stamped> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T: Stamped> MemoryStore<T> {
    /// Create a store that retains the last `history_limit` changes.
    ///
    /// The limit also bounds how far a live subscriber may fall behind
    /// before its subscription is ended.
    pub fn new(history_limit: usize) -> Self {
        let history_limit = history_limit.max(1);
        let (live, _) = broadcast::channel(history_limit);
        Self {
            inner: Mutex::new(Inner {
                version: 0,
                compacted: 0,
                objects: BTreeMap::new(),
                history: VecDeque::new(),
            }),
            live,
            history_limit,
            kind: "object".to_string(),
        }
    }

    /// Set the kind name used in not-found messages.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Current store version.
    pub fn version(&self) -> Result<Cursor, StoreError> {
        Ok(Cursor::new(self.lock()?.version.to_string()))
    }

    /// Number of open live subscriptions.
    pub fn watcher_count(&self) -> usize {
        self.live.receiver_count()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner<T>>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn record(&self, inner: &mut Inner<T>, namespace: &str, event: ChangeEvent<T>) {
        let change = Change {
            version: inner.version,
            namespace: namespace.to_string(),
            event,
        };
        inner.history.push_back(change.clone());
        while inner.history.len() > self.history_limit {
            if let Some(evicted) = inner.history.pop_front() {
                inner.compacted = evicted.version;
            }
        }
        // No receivers is fine
        let _ = self.live.send(change);
    }

    fn not_found(&self, name: &str) -> StoreError {
        StoreError::not_found(&self.kind, name)
    }
}

fn parse_cursor(cursor: &Cursor) -> Result<u64, StoreError> {
    cursor
        .as_str()
        .parse()
        .map_err(|_| StoreError::InvalidCursor(cursor.to_string()))
}

#[async_trait]
impl<T: Stamped> ObjectStore<T> for MemoryStore<T> {
    async fn list(&self, selector: &Selector) -> Result<Snapshot<T>, StoreError> {
        let inner = self.lock()?;
        let items = inner
            .objects
            .iter()
            .filter(|((namespace, _), _)| selector.matches(namespace))
            .map(|(_, entry)| entry.object.clone())
            .collect();
        Ok(Snapshot {
            items,
            cursor: Cursor::new(inner.version.to_string()),
        })
    }

    async fn watch(&self, selector: &Selector, from: &Cursor) -> Result<Subscription<T>, StoreError> {
        let from_version = parse_cursor(from)?;

        // Backlog and live receiver are taken under one lock so no change
        // falls between them or shows up in both.
        let (backlog, receiver) = {
            let inner = self.lock()?;
            if from_version > inner.version {
                return Err(StoreError::InvalidCursor(format!(
                    "{} is ahead of store version {}",
                    from_version, inner.version
                )));
            }
            if from_version < inner.compacted {
                return Err(StoreError::Expired {
                    cursor: from.to_string(),
                    oldest: inner.compacted.to_string(),
                });
            }
            let backlog: Vec<WatchEvent<T>> = inner
                .history
                .iter()
                .filter(|change| change.version > from_version && selector.matches(&change.namespace))
                .map(|change| WatchEvent::from(change.event.clone()))
                .collect();
            (backlog, self.live.subscribe())
        };

        tracing::debug!(
            namespace = %selector.namespace,
            from = from_version,
            backlog = backlog.len(),
            "Opened memory store watch"
        );

        let selector = selector.clone();
        let live = futures::stream::unfold(Some(receiver), move |state| {
            let selector = selector.clone();
            async move {
                let mut receiver = state?;
                loop {
                    match receiver.recv().await {
                        Ok(change) if selector.matches(&change.namespace) => {
                            return Some((WatchEvent::from(change.event), Some(receiver)));
                        }
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            tracing::warn!(missed, "Memory store watcher fell behind");
                            let message = format!("watcher fell behind by {} changes", missed);
                            return Some((WatchEvent::Error(message), None));
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        });

        Ok(Box::pin(futures::stream::iter(backlog).chain(live)))
    }

    async fn get(&self, selector: &Selector, name: &str) -> Result<T, StoreError> {
        let inner = self.lock()?;
        inner
            .objects
            .get(&(selector.namespace.clone(), name.to_string()))
            .map(|entry| entry.object.clone())
            .ok_or_else(|| self.not_found(name))
    }

    async fn put(&self, selector: &Selector, name: &str, mut obj: T) -> Result<T, StoreError> {
        let mut inner = self.lock()?;
        let key = (selector.namespace.clone(), name.to_string());
        inner.version += 1;

        let existing = inner
            .objects
            .get(&key)
            .map(|entry| (entry.uid.clone(), entry.created_at));
        let created = existing.is_none();
        let (uid, created_at) =
            existing.unwrap_or_else(|| (uuid::Uuid::new_v4().to_string(), Utc::now()));

        obj.stamp(&Stamp {
            namespace: selector.namespace.clone(),
            name: name.to_string(),
            uid: uid.clone(),
            resource_version: inner.version.to_string(),
            created_at,
        });
        inner.objects.insert(
            key,
            Entry {
                object: obj.clone(),
                uid,
                created_at,
            },
        );

        let event = if created {
            ChangeEvent::Added(obj.clone())
        } else {
            ChangeEvent::Modified(obj.clone())
        };
        self.record(&mut inner, &selector.namespace, event);
        Ok(obj)
    }

    async fn delete(&self, selector: &Selector, name: &str) -> Result<T, StoreError> {
        let mut inner = self.lock()?;
        let key = (selector.namespace.clone(), name.to_string());
        let entry = inner.objects.remove(&key).ok_or_else(|| self.not_found(name))?;
        inner.version += 1;

        let mut obj = entry.object;
        obj.stamp(&Stamp {
            namespace: selector.namespace.clone(),
            name: name.to_string(),
            uid: entry.uid,
            resource_version: inner.version.to_string(),
            created_at: entry.created_at,
        });
        self.record(&mut inner, &selector.namespace, ChangeEvent::Deleted(obj.clone()));
        Ok(obj)
    }
}
