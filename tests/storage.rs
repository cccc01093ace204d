//! Storage-level tests against a scratch root directory.

use std::path::PathBuf;

use tempfile::TempDir;

use webedit_server::error::StorageError;
use webedit_server::storage::{
    EntryKind, create_path, delete_file, list_directory, read_file, store_upload,
};

fn scratch_root() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    // Canonical, like the server root at startup.
    let root = dir.path().canonicalize().unwrap();
    (dir, root)
}

#[tokio::test]
async fn root_listing_has_no_parent_link() {
    let (_dir, root) = scratch_root();
    std::fs::write(root.join("a.txt"), vec![b'x'; 500]).unwrap();
    std::fs::create_dir(root.join("sub")).unwrap();

    let entries = list_directory(&root, "/").await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.name != ".."));

    let file = entries.iter().find(|e| e.name == "a.txt").unwrap();
    assert_eq!(file.kind, EntryKind::File);
    assert_eq!(file.size, Some(500));
    assert!(file.modified_ms.is_some());

    let sub = entries.iter().find(|e| e.name == "sub").unwrap();
    assert_eq!(sub.kind, EntryKind::Dir);
    assert_eq!(sub.size, None);
}

#[tokio::test]
async fn subdirectory_listing_starts_with_parent_link() {
    let (_dir, root) = scratch_root();
    std::fs::create_dir(root.join("sub")).unwrap();
    std::fs::write(root.join("sub").join("b.txt"), b"hi").unwrap();

    let entries = list_directory(&root, "/sub").await.unwrap();

    assert_eq!(entries[0].name, "..");
    assert_eq!(entries[0].kind, EntryKind::Dir);
    assert_eq!(entries[0].size, None);
    assert!(entries[0].modified_ms.is_some());
    assert!(entries[1..].iter().any(|e| e.name == "b.txt"));
}

#[tokio::test]
async fn listing_missing_directory_fails() {
    let (_dir, root) = scratch_root();

    let err = list_directory(&root, "/nope").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[tokio::test]
async fn listing_a_file_fails() {
    let (_dir, root) = scratch_root();
    std::fs::write(root.join("a.txt"), b"hi").unwrap();

    let err = list_directory(&root, "/a.txt").await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::NotADirectory(_) | StorageError::IoError(_)
    ));
}

#[tokio::test]
async fn upload_then_read_round_trips_bytes() {
    let (_dir, root) = scratch_root();
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    store_upload(&root, "/blob.bin", &payload).await.unwrap();
    let content = read_file(&root, "/blob.bin").await.unwrap();

    assert_eq!(content.data, payload);
    assert_eq!(content.content_type, "application/octet-stream");
    assert_eq!(content.file_name, "blob.bin");
}

#[tokio::test]
async fn upload_creates_missing_parent_directories() {
    let (_dir, root) = scratch_root();

    store_upload(&root, "/a/b/c.txt", b"nested").await.unwrap();

    assert_eq!(std::fs::read(root.join("a/b/c.txt")).unwrap(), b"nested");
}

#[tokio::test]
async fn text_file_gets_extension_derived_type() {
    let (_dir, root) = scratch_root();
    std::fs::write(root.join("notes.txt"), b"plain text\n").unwrap();

    let content = read_file(&root, "/notes.txt").await.unwrap();
    assert_eq!(content.content_type, "text/plain");
}

#[tokio::test]
async fn binary_content_overrides_txt_extension() {
    let (_dir, root) = scratch_root();
    std::fs::write(root.join("fake.txt"), b"looks text\0but is not").unwrap();

    let content = read_file(&root, "/fake.txt").await.unwrap();
    assert_eq!(content.content_type, "application/octet-stream");
}

#[tokio::test]
async fn reading_missing_file_is_not_found() {
    let (_dir, root) = scratch_root();

    let err = read_file(&root, "/nope.txt").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn overwrite_preserves_prior_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, root) = scratch_root();
    let target = root.join("a.txt");
    std::fs::write(&target, b"old").unwrap();
    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o600)).unwrap();

    store_upload(&root, "/a.txt", b"new contents").await.unwrap();

    let mode = std::fs::metadata(&target).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    assert_eq!(std::fs::read(&target).unwrap(), b"new contents");
}

#[cfg(unix)]
#[tokio::test]
async fn new_upload_gets_default_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, root) = scratch_root();

    store_upload(&root, "/fresh.txt", b"hello").await.unwrap();

    let mode = std::fs::metadata(root.join("fresh.txt"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o644);
}

#[tokio::test]
async fn create_path_makes_empty_file_and_parents() {
    let (_dir, root) = scratch_root();

    create_path(&root, "/docs/new.txt").await.unwrap();

    let metadata = std::fs::metadata(root.join("docs/new.txt")).unwrap();
    assert!(metadata.is_file());
    assert_eq!(metadata.len(), 0);
}

#[tokio::test]
async fn create_path_with_trailing_separator_makes_directory_only() {
    let (_dir, root) = scratch_root();

    create_path(&root, "/folder/inner/").await.unwrap();

    assert!(root.join("folder/inner").is_dir());
    assert_eq!(std::fs::read_dir(root.join("folder/inner")).unwrap().count(), 0);
}

#[tokio::test]
async fn create_path_truncates_existing_file() {
    let (_dir, root) = scratch_root();
    std::fs::write(root.join("a.txt"), b"old contents").unwrap();

    create_path(&root, "/a.txt").await.unwrap();

    assert_eq!(std::fs::metadata(root.join("a.txt")).unwrap().len(), 0);
}

#[tokio::test]
async fn delete_is_not_idempotent() {
    let (_dir, root) = scratch_root();
    std::fs::write(root.join("a.txt"), b"bye").unwrap();

    delete_file(&root, "/a.txt").await.unwrap();
    assert!(!root.join("a.txt").exists());

    let err = delete_file(&root, "/a.txt").await.unwrap_err();
    assert!(matches!(err, StorageError::DeleteFailed { .. }));
}

#[tokio::test]
async fn delete_refuses_directories() {
    let (_dir, root) = scratch_root();
    std::fs::create_dir(root.join("sub")).unwrap();

    let err = delete_file(&root, "/sub").await.unwrap_err();
    assert!(matches!(err, StorageError::DeleteFailed { .. }));
    assert!(root.join("sub").is_dir());
}

#[tokio::test]
async fn operations_refuse_traversal_before_touching_disk() {
    let (_dir, root) = scratch_root();

    assert!(matches!(
        list_directory(&root, "/../../etc").await.unwrap_err(),
        StorageError::PathTraversal(_)
    ));
    assert!(matches!(
        read_file(&root, "/../../etc/passwd").await.unwrap_err(),
        StorageError::PathTraversal(_)
    ));
    assert!(matches!(
        store_upload(&root, "/a/../../b", b"x").await.unwrap_err(),
        StorageError::PathTraversal(_)
    ));
    assert!(matches!(
        create_path(&root, "/../new").await.unwrap_err(),
        StorageError::PathTraversal(_)
    ));
    assert!(matches!(
        delete_file(&root, "/../victim").await.unwrap_err(),
        StorageError::PathTraversal(_)
    ));
}

#[tokio::test]
async fn stray_upload_artifacts_are_not_left_behind() {
    let (_dir, root) = scratch_root();

    store_upload(&root, "/a.txt", b"data").await.unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(&root)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".upload"))
        .collect();
    assert!(leftovers.is_empty(), "leftover temp files: {leftovers:?}");
}
