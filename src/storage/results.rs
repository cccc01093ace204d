//! Storage result types
//!
//! Defines result structures returned by storage operations.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of a directory child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One child of a listed directory.
///
/// `size`, `permissions`, and `date` are omitted when they do not apply
/// (directories) or when the stat for that entry failed; a stat failure
/// never drops the entry itself.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<String>,
    #[serde(rename = "date", skip_serializing_if = "Option::is_none")]
    pub modified_ms: Option<u64>,
}

impl DirectoryEntry {
    /// Synthetic `..` entry prepended to non-root listings.
    pub fn parent_link() -> Self {
        Self {
            name: "..".to_string(),
            kind: EntryKind::Dir,
            size: None,
            permissions: None,
            modified_ms: Some(now_millis()),
        }
    }

    pub fn directory(name: String) -> Self {
        Self {
            name,
            kind: EntryKind::Dir,
            size: None,
            permissions: None,
            modified_ms: None,
        }
    }

    pub fn file(name: String, size: u64, permissions: Option<String>, modified_ms: Option<u64>) -> Self {
        Self {
            name,
            kind: EntryKind::File,
            size: Some(size),
            permissions,
            modified_ms,
        }
    }

    /// A file whose stat failed: listed by name, fields unknown.
    pub fn file_unknown(name: String) -> Self {
        Self {
            name,
            kind: EntryKind::File,
            size: None,
            permissions: None,
            modified_ms: None,
        }
    }
}

/// Result of a file read.
#[derive(Debug, Clone)]
pub struct FileContent {
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Current time in milliseconds since the epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis() as u64)
        .unwrap_or(0)
}
