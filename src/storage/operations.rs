//! Storage operations
//!
//! Handles the filesystem work behind the HTTP surface: directory
//! listing, file retrieval, upload, empty-file/folder creation, and
//! deletion. Every operation resolves its user path through the
//! validation layer before touching the filesystem.

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs;

use crate::error::StorageError;
use crate::storage::content::{OCTET_STREAM, is_binary, mime_for_path};
use crate::storage::permissions::{DEFAULT_FILE_MODE, apply_mode, mode_bits, mode_string};
use crate::storage::results::{DirectoryEntry, FileContent};
use crate::storage::validation::resolve_request_path;

/// Lists the direct children of a directory.
///
/// Non-root listings get a synthetic `..` entry first so clients can
/// navigate up. A stat failure for one child degrades that child's
/// fields to unknown but keeps it in the listing.
pub async fn list_directory(
    root: &Path,
    requested: &str,
) -> Result<Vec<DirectoryEntry>, StorageError> {
    let dir = resolve_request_path(root, requested)?;

    let mut reader = fs::read_dir(&dir).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StorageError::NotFound(requested.to_string()),
        std::io::ErrorKind::NotADirectory => StorageError::NotADirectory(requested.to_string()),
        _ => StorageError::IoError(e),
    })?;

    let mut entries = Vec::new();
    if dir != root {
        entries.push(DirectoryEntry::parent_link());
    }

    while let Some(child) = reader.next_entry().await? {
        let name = child.file_name().to_string_lossy().into_owned();

        let is_dir = match child.file_type().await {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                warn!("Couldn't determine type of {name}: {e}");
                false
            }
        };

        if is_dir {
            entries.push(DirectoryEntry::directory(name));
            continue;
        }

        match child.metadata().await {
            Ok(metadata) => {
                let modified = metadata
                    .modified()
                    .ok()
                    .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                    .map(|dur| dur.as_millis() as u64);
                let permissions = mode_bits(&metadata).map(mode_string);
                entries.push(DirectoryEntry::file(
                    name,
                    metadata.len(),
                    permissions,
                    modified,
                ));
            }
            Err(e) => {
                // Size is used by clients to decide if a file is too
                // big to edit; unknown still lets them navigate.
                warn!("Couldn't stat {name}: {e}");
                entries.push(DirectoryEntry::file_unknown(name));
            }
        }
    }

    info!(
        "Listed directory {} (real: {}) - {} entries",
        requested,
        dir.display(),
        entries.len()
    );

    Ok(entries)
}

/// Reads a whole file and classifies its content.
///
/// Binary content is always served as octet-stream; text content gets
/// the extension-derived type.
pub async fn read_file(root: &Path, requested: &str) -> Result<FileContent, StorageError> {
    let path = resolve_request_path(root, requested)?;

    let data = fs::read(&path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StorageError::NotFound(requested.to_string()),
        _ => StorageError::IoError(e),
    })?;

    let content_type = if is_binary(&data) {
        OCTET_STREAM
    } else {
        mime_for_path(&path)
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| requested.to_string());

    info!(
        "Read file {} (real: {}) - {} bytes, {}",
        requested,
        path.display(),
        data.len(),
        content_type
    );

    Ok(FileContent {
        data,
        content_type,
        file_name,
    })
}

/// Stores uploaded content at the destination, overwriting in place.
///
/// If the destination already exists its mode bits are captured first
/// and reapplied after the copy; new files get [`DEFAULT_FILE_MODE`].
/// Missing parent directories are created before any bytes move. The
/// content lands via a temporary file in the same directory followed
/// by a rename. After the write the mode is re-read and compared; a
/// mismatch is reported even though the bytes were persisted.
pub async fn store_upload(root: &Path, requested: &str, data: &[u8]) -> Result<(), StorageError> {
    let dest = resolve_request_path(root, requested)?;

    // Must happen before the copy replaces the file.
    let prior_mode = fs::metadata(&dest).await.ok().and_then(|m| mode_bits(&m));
    if let Some(mode) = prior_mode {
        info!("{} had permissions {}", requested, mode_string(mode));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
    }

    let temp = temp_upload_path(&dest);
    if let Err(e) = fs::write(&temp, data).await {
        discard_temp(&temp).await;
        return Err(StorageError::CopyFailed {
            path: requested.to_string(),
            source: e,
        });
    }
    if let Err(e) = fs::rename(&temp, &dest).await {
        discard_temp(&temp).await;
        return Err(StorageError::CopyFailed {
            path: requested.to_string(),
            source: e,
        });
    }

    let target_mode = prior_mode.unwrap_or(DEFAULT_FILE_MODE);
    if let Err(e) = apply_mode(&dest, target_mode).await {
        // The re-check below reports the drift to the caller.
        warn!("Failed to set permissions on {requested}: {e}");
    }

    #[cfg(unix)]
    {
        let actual = fs::metadata(&dest).await.ok().and_then(|m| mode_bits(&m));
        if actual != Some(target_mode) {
            error!(
                "Permissions drifted on {} after write: wanted {}",
                requested,
                mode_string(target_mode)
            );
            return Err(StorageError::PermissionMismatch {
                path: requested.to_string(),
                expected: target_mode,
                actual,
            });
        }
    }

    info!(
        "Stored {} (real: {}) - {} bytes, mode {}",
        requested,
        dest.display(),
        data.len(),
        mode_string(target_mode)
    );

    Ok(())
}

/// Creates an empty file, or only the directory chain for paths with a
/// trailing separator.
///
/// An existing file at the destination is truncated.
pub async fn create_path(root: &Path, requested: &str) -> Result<(), StorageError> {
    let dest = resolve_request_path(root, requested)?;

    if requested.ends_with('/') || requested.ends_with('\\') {
        fs::create_dir_all(&dest)
            .await
            .map_err(|e| StorageError::DirectoryCreationFailed {
                path: requested.to_string(),
                source: e,
            })?;
        info!("Created directory {} (real: {})", requested, dest.display());
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StorageError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source: e,
            })?;
    }

    fs::write(&dest, b"")
        .await
        .map_err(|e| StorageError::CopyFailed {
            path: requested.to_string(),
            source: e,
        })?;

    info!("Created file {} (real: {})", requested, dest.display());
    Ok(())
}

/// Deletes a single file. Directories are not deleted.
pub async fn delete_file(root: &Path, requested: &str) -> Result<(), StorageError> {
    let target = resolve_request_path(root, requested)?;

    fs::remove_file(&target)
        .await
        .map_err(|e| StorageError::DeleteFailed {
            path: requested.to_string(),
            source: e,
        })?;

    info!("Deleted file {} (real: {})", requested, target.display());
    Ok(())
}

/// Temporary path next to the destination so the final rename stays on
/// one filesystem.
fn temp_upload_path(dest: &Path) -> PathBuf {
    let extension = dest
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    dest.with_extension(format!("{}.upload", extension))
}

/// Best-effort cleanup of an upload artifact; failure is only logged.
async fn discard_temp(temp: &Path) {
    if let Err(e) = fs::remove_file(temp).await {
        warn!("Temporary file {} not cleaned up: {e}", temp.display());
    }
}
