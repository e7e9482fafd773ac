//! Core data structures shared by the builder, the cortex and the conductor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a stored document (post, page or dictionary entry)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A published vocabulary entry as the entry store reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: DocumentId,
    /// Headword, display casing preserved
    pub title: String,
    /// Canonical URL of the entry's detail page
    pub permalink: String,
}

impl EntryRecord {
    pub fn new(id: impl Into<DocumentId>, title: &str, permalink: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            permalink: permalink.to_string(),
        }
    }
}

/// The document currently being rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Post type, checked against `LinkerConfig::linkable_kinds`
    pub kind: String,
    pub raw_content: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, kind: &str, raw_content: &str) -> Self {
        Self {
            id: id.into(),
            kind: kind.to_string(),
            raw_content: raw_content.to_string(),
        }
    }
}
