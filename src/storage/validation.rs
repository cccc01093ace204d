//! Path validation
//!
//! Resolves untrusted request paths against the server root. This is
//! the sole gatekeeper for all filesystem access: every handler must
//! pass user input through [`resolve_request_path`] before any
//! filesystem call.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Resolve a user-supplied path relative to the server root.
///
/// The path is normalized lexically first: empty and `.` segments are
/// dropped, `..` pops the previous segment, and both separator styles
/// are treated as separators. Normalization happens before the join so
/// traversal sequences can never survive into the filesystem call. A
/// `..` with nothing left to pop means the path points above the root
/// and is refused.
///
/// The empty string and `/` both resolve to the root itself (used for
/// root listings); trailing separators are insignificant here.
pub fn resolve_request_path(root: &Path, requested: &str) -> Result<PathBuf, StorageError> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in requested.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                if segments.pop().is_none() {
                    return Err(StorageError::PathTraversal(requested.to_string()));
                }
            }
            name => segments.push(name),
        }
    }

    let mut resolved = root.to_path_buf();
    for segment in &segments {
        resolved.push(segment);
    }

    // The resolved path must equal the root or be a strict descendant.
    if resolved != *root && !resolved.starts_with(root) {
        return Err(StorageError::PathTraversal(requested.to_string()));
    }

    Ok(resolved)
}
