//! Errors raised by an object store.

use thiserror::Error;

/// Failure of a list, watch or point operation against an object store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} {name} not found")]
    NotFound { kind: String, name: String },

    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    /// The cursor is older than the retained change history.
    #[error("cursor {cursor} is too old, oldest available is {oldest}")]
    Expired { cursor: String, oldest: String },

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
