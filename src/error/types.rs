//! Error types
//!
//! Defines domain-specific error types for the storage layer.

use std::fmt;
use std::io;

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    /// The requested path would escape the server root. Rejected before
    /// any filesystem call.
    PathTraversal(String),
    NotFound(String),
    NotADirectory(String),
    DirectoryCreationFailed { path: String, source: io::Error },
    CopyFailed { path: String, source: io::Error },
    /// Content was written but the mode bits read back after the write
    /// differ from the intended ones.
    PermissionMismatch {
        path: String,
        expected: u32,
        actual: Option<u32>,
    },
    DeleteFailed { path: String, source: io::Error },
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::NotFound(p) => write!(f, "File not found: {}", p),
            StorageError::NotADirectory(p) => write!(f, "Not a directory: {}", p),
            StorageError::DirectoryCreationFailed { path, source } => {
                write!(f, "Failed to create directory {}: {}", path, source)
            }
            StorageError::CopyFailed { path, source } => {
                write!(f, "Failed to write {}: {}", path, source)
            }
            StorageError::PermissionMismatch {
                path,
                expected,
                actual,
            } => match actual {
                Some(actual) => write!(
                    f,
                    "Permissions error on {}: expected {:o}, found {:o}",
                    path, expected, actual
                ),
                None => write!(
                    f,
                    "Permissions error on {}: expected {:o}, could not re-read mode",
                    path, expected
                ),
            },
            StorageError::DeleteFailed { path, source } => {
                write!(f, "Failed to delete {}: {}", path, source)
            }
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}
