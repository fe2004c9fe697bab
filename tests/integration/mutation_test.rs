//! Integration tests for renames, moves, deletes, and replacement.

use arbor_core::error::ErrorKind;
use arbor_entity::folder::Folder;

use crate::helpers::{TestStore, sample_tree};

async fn with_docs(test: &TestStore) -> Folder {
    sample_tree(test);
    let local = test.local_tree("docs").await;
    test.store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_root_cannot_be_mutated() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let root = test.store.root_id();

    let err = test.store.folders.delete_folder(root).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    let err = test.store.folders.rename_folder(root, "TOP").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    let err = test.store.folders.move_folder(root, docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    assert_eq!(test.meta.folder_count(), 3);
}

#[tokio::test]
async fn test_rename_folder() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;

    let renamed = test.store.folders.rename_folder(docs.id, " manuals ").await.unwrap();
    assert_eq!(renamed.name, "manuals");
    assert!(test.store.paths.file_exists_at("manuals/img/logo.png", '/').await.unwrap());
    assert!(!test.store.paths.folder_exists_at("docs", '/').await.unwrap());
    assert_eq!(test.size_at("manuals").await, 13);
}

#[tokio::test]
async fn test_rename_rejects_bad_names_and_collisions() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    test.store.folders.create_folder("other", '/').await.unwrap();

    let err = test.store.folders.rename_folder(docs.id, "other").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NameConflict);
    let err = test.store.folders.rename_folder(docs.id, "a/b").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    let err = test.store.folders.rename_folder(docs.id, "   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    test.write("notes.txt", b"n");
    let notes = test.local_file("notes.txt").await;
    let notes = test.store.uploads.upload_file(&notes, docs.id, true).await.unwrap();
    let err = test
        .store
        .files
        .rename_file(notes.id, "readme", "txt")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let subject = err.subject.unwrap();
    assert_eq!(subject.parent_id, Some(docs.id.into_uuid()));
    assert_eq!(subject.name.as_deref(), Some("readme"));
    assert_eq!(subject.extension.as_deref(), Some("txt"));
    assert!(test.store.paths.file_exists_at("docs/notes.txt", '/').await.unwrap());

    let renamed = test.store.files.rename_file(notes.id, "readme", "md").await.unwrap();
    assert_eq!(renamed.full_name(), "readme.md");
}

#[tokio::test]
async fn test_move_folder_keeps_sizes_and_depths() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let target = test.store.folders.create_folder("archive/2024", '/').await.unwrap();

    let moved = test.store.folders.move_folder(docs.id, target.id).await.unwrap();
    assert_eq!(moved.depth, 3);
    assert_eq!(moved.parent_id, Some(target.id));

    let img = test
        .store
        .paths
        .resolve_folder("archive/2024/docs/img", '/')
        .await
        .unwrap();
    assert_eq!(img.depth, 4);
    assert_eq!(test.size_at("archive/2024").await, 13);
    assert_eq!(test.size_at("archive").await, 13);
    assert_eq!(test.size_at("").await, 13);
}

#[tokio::test]
async fn test_move_folder_between_branches() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let left = test.store.folders.create_folder("left", '/').await.unwrap();
    let right = test.store.folders.create_folder("right/inner", '/').await.unwrap();

    test.store.folders.move_folder(docs.id, left.id).await.unwrap();
    assert_eq!(test.size_at("left").await, 13);

    test.store.folders.move_folder(docs.id, right.id).await.unwrap();
    assert_eq!(test.size_at("left").await, 0);
    assert_eq!(test.size_at("right").await, 13);
    assert_eq!(test.size_at("right/inner/docs/img").await, 8);
    assert_eq!(test.size_at("").await, 13);
}

#[tokio::test]
async fn test_move_folder_into_own_subtree_fails() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let img = test.store.paths.resolve_folder("docs/img", '/').await.unwrap();

    let err = test.store.folders.move_folder(docs.id, img.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    let err = test.store.folders.move_folder(docs.id, docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_move_folder_name_collision() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let elsewhere = test.store.folders.create_folder("elsewhere/docs", '/').await.unwrap();
    let parent = elsewhere.parent_id.unwrap();

    let err = test.store.folders.move_folder(docs.id, parent).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NameConflict);
}

#[tokio::test]
async fn test_move_file_updates_both_chains() {
    let test = TestStore::new().await;
    with_docs(&test).await;
    let logo = test.store.paths.resolve_file("docs/img/logo.png", '/').await.unwrap();

    let moved = test
        .store
        .files
        .move_file(logo.id, test.store.root_id())
        .await
        .unwrap();
    assert_eq!(moved.folder_id, test.store.root_id());
    assert_eq!(test.size_at("docs/img").await, 0);
    assert_eq!(test.size_at("docs").await, 5);
    assert_eq!(test.size_at("").await, 13);
    assert_eq!(test.content_at("logo.png").await, b"\x89PNGdata");
}

#[tokio::test]
async fn test_delete_folder_removes_subtree_and_blobs() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;

    test.store.folders.delete_folder(docs.id).await.unwrap();
    assert_eq!(test.size_at("").await, 0);
    assert_eq!(test.meta.folder_count(), 1);
    assert_eq!(test.meta.file_count(), 0);
    assert!(test.blobs.is_empty());

    let err = test.store.tree.folder(docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_file() {
    let test = TestStore::new().await;
    with_docs(&test).await;
    let readme = test.store.paths.resolve_file("docs/readme.txt", '/').await.unwrap();

    let removed = test.store.files.delete_file(readme.id).await.unwrap();
    assert_eq!(removed.id, readme.id);
    assert_eq!(test.size_at("docs").await, 8);
    assert_eq!(test.size_at("").await, 8);
    assert_eq!(test.blobs.len(), 1);
    assert!(!test.store.paths.file_exists(readme.id).await.unwrap());

    let err = test.store.files.delete_file(readme.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_replace_file_applies_size_delta() {
    let test = TestStore::new().await;
    with_docs(&test).await;
    let readme = test.store.paths.resolve_file("docs/readme.txt", '/').await.unwrap();

    test.write("new/readme.txt", b"hello, world");
    let local = test.local_file("new/readme.txt").await;
    let replaced = test.store.files.replace_file(&readme, &local).await.unwrap();

    assert_ne!(replaced.id, readme.id);
    assert_eq!(replaced.full_name(), "readme.txt");
    assert_eq!(replaced.size_bytes, 12);
    assert_eq!(test.size_at("docs").await, 20);
    assert_eq!(test.size_at("").await, 20);
    assert_eq!(test.blobs.len(), 2);
    assert!(!test.store.paths.file_exists(readme.id).await.unwrap());
    assert_eq!(test.content_at("docs/readme.txt").await, b"hello, world");
}

#[tokio::test]
async fn test_create_folder_is_idempotent() {
    let test = TestStore::new().await;

    let c = test.store.folders.create_folder("a/b/c", '/').await.unwrap();
    assert_eq!(c.depth, 3);
    assert_eq!(test.meta.folder_count(), 4);

    let again = test.store.folders.create_folder("/a/b/c/", '/').await.unwrap();
    assert_eq!(again.id, c.id);
    assert_eq!(test.meta.folder_count(), 4);

    let d = test.store.folders.create_folder("a/b/d", '/').await.unwrap();
    assert_eq!(d.parent_id, c.parent_id);
    assert_eq!(test.meta.folder_count(), 5);
}
