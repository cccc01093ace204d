//! Error handlers
//!
//! Maps storage errors to HTTP status codes and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};

use crate::error::types::StorageError;

/// Convert a storage error to the HTTP status it is reported with.
///
/// Traversal attempts are refused with 403, missing files with 404,
/// failed mutations with 400 carrying the underlying error text.
pub fn error_to_status(err: &StorageError) -> StatusCode {
    match err {
        StorageError::PathTraversal(_) => StatusCode::FORBIDDEN,
        StorageError::NotFound(_) | StorageError::NotADirectory(_) => StatusCode::NOT_FOUND,
        StorageError::DirectoryCreationFailed { .. }
        | StorageError::CopyFailed { .. }
        | StorageError::PermissionMismatch { .. }
        | StorageError::DeleteFailed { .. } => StatusCode::BAD_REQUEST,
        StorageError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the client-visible response for a storage error.
pub fn error_response(err: &StorageError) -> Response {
    let status = error_to_status(err);
    if status.is_server_error() {
        error!("{err}");
    } else {
        warn!("{err}");
    }
    (status, err.to_string()).into_response()
}
