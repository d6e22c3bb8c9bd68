//! Collection selectors, cursors and change events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a collection. An empty namespace selects every namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selector {
    pub namespace: String,
}

impl Selector {
    pub fn namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, namespace: &str) -> bool {
        self.namespace.is_empty() || self.namespace == namespace
    }
}

/// Opaque version token naming one point in a store's change history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Cursor(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a point-in-time list read.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub cursor: Cursor,
}

/// An incremental change to one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "object", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeEvent<T> {
    Added(T),
    Modified(T),
    Deleted(T),
}

impl<T> ChangeEvent<T> {
    pub fn object(&self) -> &T {
        match self {
            ChangeEvent::Added(obj) | ChangeEvent::Modified(obj) | ChangeEvent::Deleted(obj) => obj,
        }
    }

    pub fn into_object(self) -> T {
        match self {
            ChangeEvent::Added(obj) | ChangeEvent::Modified(obj) | ChangeEvent::Deleted(obj) => obj,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChangeEvent::Added(_) => "ADDED",
            ChangeEvent::Modified(_) => "MODIFIED",
            ChangeEvent::Deleted(_) => "DELETED",
        }
    }
}

/// What a store subscription yields: changes plus control events.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent<T> {
    Added(T),
    Modified(T),
    Deleted(T),
    /// Progress marker carrying no object.
    Bookmark(Cursor),
    /// The store reported a problem on the subscription.
    Error(String),
}

impl<T> WatchEvent<T> {
    /// The change carried by this event, if it is one.
    pub fn into_change(self) -> Option<ChangeEvent<T>> {
        match self {
            WatchEvent::Added(obj) => Some(ChangeEvent::Added(obj)),
            WatchEvent::Modified(obj) => Some(ChangeEvent::Modified(obj)),
            WatchEvent::Deleted(obj) => Some(ChangeEvent::Deleted(obj)),
            WatchEvent::Bookmark(_) | WatchEvent::Error(_) => None,
        }
    }
}

impl<T> From<ChangeEvent<T>> for WatchEvent<T> {
    fn from(event: ChangeEvent<T>) -> Self {
        match event {
            ChangeEvent::Added(obj) => WatchEvent::Added(obj),
            ChangeEvent::Modified(obj) => WatchEvent::Modified(obj),
            ChangeEvent::Deleted(obj) => WatchEvent::Deleted(obj),
        }
    }
}
