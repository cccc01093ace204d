//! Request routing
//!
//! Dispatches `/edit` requests to the storage operations and serves
//! everything else as static assets relative to the root. Exactly one
//! handler runs per request; every user-supplied path goes through the
//! resolver before any filesystem call.

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Query, Request, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{AppendHeaders, IntoResponse, Json, Response};
use axum::routing::get;
use axum::{Form, Router};
use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::StorageError;
use crate::error::handlers::error_response;
use crate::server::core::ServerContext;
use crate::storage::content::mime_for_path;
use crate::storage::validation::resolve_request_path;
use crate::storage::{create_path, delete_file, list_directory, read_file, store_upload};

pub fn build_router(context: Arc<ServerContext>) -> Router {
    let body_limit = context.config.max_upload_bytes();

    Router::new()
        .route(
            "/edit",
            get(handle_edit_query)
                .post(handle_upload)
                .put(handle_create)
                .delete(handle_delete),
        )
        .fallback(handle_static)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(context)
}

#[derive(Debug, Deserialize)]
struct EditQuery {
    list: Option<String>,
    edit: Option<String>,
    download: Option<String>,
}

/// Form body carrying the target path for PUT and DELETE.
#[derive(Debug, Deserialize)]
struct PathForm {
    path: String,
}

/// GET `/edit` dispatch: `?list=` for listings, `?edit=`/`?download=`
/// for file reads.
async fn handle_edit_query(
    State(context): State<Arc<ServerContext>>,
    Query(query): Query<EditQuery>,
) -> Response {
    if let Some(dir) = query.list {
        return handle_list(&context, &dir).await;
    }

    let (name, download) = match (query.edit, query.download) {
        (Some(name), _) => (name, false),
        (None, Some(name)) => (name, true),
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                "missing list, edit or download parameter",
            )
                .into_response();
        }
    };

    handle_read(&context, &name, download).await
}

async fn handle_list(context: &ServerContext, dir: &str) -> Response {
    match list_directory(&context.root, dir).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err @ StorageError::PathTraversal(_)) => {
            warn!("{err}");
            (StatusCode::FORBIDDEN, err.to_string()).into_response()
        }
        // A listing that cannot be opened is a server error, not a
        // client 404.
        Err(err) => {
            log::error!("Failed to list {dir}: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn handle_read(context: &ServerContext, name: &str, download: bool) -> Response {
    match read_file(&context.root, name).await {
        Ok(content) => {
            let mut headers = vec![(header::CONTENT_TYPE, content.content_type.to_string())];
            if download {
                headers.push((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", content.file_name),
                ));
            }
            (AppendHeaders(headers), content.data).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// POST `/edit`: multipart upload, stored at the declared filename.
async fn handle_upload(
    State(context): State<Arc<ServerContext>>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return (StatusCode::BAD_REQUEST, "missing file field in upload").into_response();
            }
            Err(e) => {
                warn!("Malformed upload form: {e}");
                return (StatusCode::BAD_REQUEST, format!("Malformed upload: {e}")).into_response();
            }
        };

        // The destination is the uploaded file's declared name; fields
        // without a filename are not uploads.
        let Some(name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to read upload body for {name}: {e}");
                return (StatusCode::BAD_REQUEST, format!("Upload failed: {e}")).into_response();
            }
        };

        info!("Upload {name} ({} bytes)", data.len());
        return match store_upload(&context.root, &name, &data).await {
            Ok(()) => "ok".into_response(),
            Err(err) => error_response(&err),
        };
    }
}

/// PUT `/edit`: create an empty file, or only the directory chain for
/// a trailing-separator path.
async fn handle_create(State(context): State<Arc<ServerContext>>, request: Request) -> Response {
    let path = match form_path_field(request).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    match create_path(&context.root, &path).await {
        Ok(()) => "ok".into_response(),
        Err(err) => error_response(&err),
    }
}

/// DELETE `/edit`: unlink one file.
async fn handle_delete(State(context): State<Arc<ServerContext>>, request: Request) -> Response {
    let path = match form_path_field(request).await {
        Ok(path) => path,
        Err(response) => return response,
    };

    match delete_file(&context.root, &path).await {
        Ok(()) => "ok".into_response(),
        Err(err) => error_response(&err),
    }
}

/// Extracts the `path` form field from either a urlencoded or a
/// multipart body; editor frontends send both.
async fn form_path_field(request: Request) -> Result<String, Response> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let mut form = Multipart::from_request(request, &())
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;
        loop {
            match form.next_field().await {
                Ok(Some(field)) if field.name() == Some("path") => {
                    return field
                        .text()
                        .await
                        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response());
                }
                Ok(Some(_)) => continue,
                Ok(None) => {
                    return Err(
                        (StatusCode::BAD_REQUEST, "missing path field in form").into_response()
                    );
                }
                Err(e) => {
                    return Err((StatusCode::BAD_REQUEST, e.to_string()).into_response());
                }
            }
        }
    }

    let Form(form): Form<PathForm> = Form::from_request(request, &())
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;
    Ok(form.path)
}

/// Default route: serve a static asset relative to the root, with the
/// content type derived from the extension. `/` maps to `index.html`.
async fn handle_static(State(context): State<Arc<ServerContext>>, uri: Uri) -> Response {
    let pathname = if uri.path() == "/" {
        "/index.html"
    } else {
        uri.path()
    };

    let resolved = match resolve_request_path(&context.root, pathname) {
        Ok(resolved) => resolved,
        Err(err) => return error_response(&err),
    };

    match tokio::fs::read(&resolved).await {
        Ok(data) => {
            let content_type = mime_for_path(&resolved);
            info!("Serving {pathname} as {content_type}");
            (
                AppendHeaders([(header::CONTENT_TYPE, content_type.to_string())]),
                data,
            )
                .into_response()
        }
        Err(e) => {
            warn!("{pathname} not found: {e}");
            (StatusCode::NOT_FOUND, format!("404 Not Found: {e}")).into_response()
        }
    }
}
