//! Bundle model
//!
//! The bundle is the arena that owns every resource of one record. Other
//! structures point into it with [`EntryId`] handles rather than holding
//! resources themselves.

use super::error::{Error, Result};
use super::resource::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Handle to a bundle entry: the entry's local id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// A fresh random identity
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bundle resource
///
/// A container for all entries of one record. Insertion order is preserved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Resource type - always "Bundle"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Indicates the purpose of this bundle - how it was intended to be used
    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    /// When the bundle was assembled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Entry in the bundle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub additional: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Bundle".to_string()
}

/// Type of Bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    /// Document Bundle - A set of resources composing a single coherent document
    Document,
    /// Message Bundle - A message (application/response or application/request)
    Message,
    /// Collection Bundle - A set of resources collected for a specific purpose
    Collection,
}

/// Entry in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// Absolute URL for the entry (`urn:uuid:<local id>`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// A resource in this bundle
    pub resource: Resource,
}

impl BundleEntry {
    /// Wrap a resource, assigning a fresh identity when it has none
    pub fn new(mut resource: Resource) -> Self {
        if resource.id.is_empty() {
            resource.id = EntryId::generate().to_string();
        }
        Self {
            full_url: Some(format!("urn:uuid:{}", resource.id)),
            resource,
        }
    }

    /// Handle of this entry
    pub fn local_id(&self) -> EntryId {
        EntryId::from(self.resource.id.as_str())
    }

    fn has_id(&self, id: &EntryId) -> bool {
        self.resource.id == id.as_str()
    }
}

impl Bundle {
    /// Create a new Bundle with minimal required fields
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            id: None,
            bundle_type,
            timestamp: None,
            entry: Vec::new(),
            additional: HashMap::new(),
        }
    }

    /// Parse from JSON Value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    /// Convert to JSON Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    /// Check if this is a document bundle
    pub fn is_document(&self) -> bool {
        matches!(self.bundle_type, BundleType::Document)
    }

    /// Get the number of entries in the bundle
    pub fn entry_count(&self) -> usize {
        self.entry.len()
    }

    /// Get entries as a slice
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entry
    }

    /// Append an entry and return its handle
    pub fn add_entry(&mut self, entry: BundleEntry) -> EntryId {
        let id = entry.local_id();
        self.entry.push(entry);
        id
    }

    pub fn get(&self, id: &EntryId) -> Option<&BundleEntry> {
        self.entry.iter().find(|e| e.has_id(id))
    }

    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut BundleEntry> {
        self.entry.iter_mut().find(|e| e.has_id(id))
    }

    /// Like [`Bundle::get`], but a missing handle is an error
    pub fn require(&self, id: &EntryId) -> Result<&BundleEntry> {
        self.get(id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))
    }

    /// First entry whose resource satisfies `predicate`
    pub fn find(&self, mut predicate: impl FnMut(&Resource) -> bool) -> Option<&BundleEntry> {
        self.entry.iter().find(|e| predicate(&e.resource))
    }

    /// Remove an entry by handle, returning it if it was present
    pub fn remove(&mut self, id: &EntryId) -> Option<BundleEntry> {
        let position = self.entry.iter().position(|e| e.has_id(id))?;
        Some(self.entry.remove(position))
    }
}
