//! File system storage management
//!
//! Handles directory listing, file reads and writes, deletion,
//! permissions, and path validation. All operations take the server
//! root explicitly and resolve user paths through
//! [`validation::resolve_request_path`] before touching the filesystem.

pub mod content;
pub mod operations;
pub mod permissions;
pub mod results;
pub mod validation;

pub use operations::{create_path, delete_file, list_directory, read_file, store_upload};
pub use results::{DirectoryEntry, EntryKind, FileContent};
pub use validation::resolve_request_path;
