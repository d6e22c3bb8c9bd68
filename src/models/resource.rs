use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned metadata written into an object on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub namespace: String,
    pub name: String,
    /// Stable identity, assigned when the object is first created
    pub uid: String,
    /// Version of the change that produced this state
    pub resource_version: String,
    pub created_at: DateTime<Utc>,
}

/// Objects that can live in a [`MemoryStore`](crate::adapters::MemoryStore).
pub trait Stamped: Clone + Send + Sync + 'static {
    fn stamp(&mut self, stamp: &Stamp);
}

/// A generic named object with arbitrary JSON data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Resource {
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
            ..Self::default()
        }
    }
}

impl Stamped for Resource {
    fn stamp(&mut self, stamp: &Stamp) {
        self.namespace = stamp.namespace.clone();
        self.name = stamp.name.clone();
        self.uid = stamp.uid.clone();
        self.resource_version = stamp.resource_version.clone();
        self.created_at = Some(stamp.created_at);
    }
}

/// JSON body of a non-streaming list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceList {
    pub items: Vec<Resource>,
    pub resource_version: String,
}
