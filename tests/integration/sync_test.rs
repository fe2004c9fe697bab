//! Integration tests for merge-forward sync.

use crate::helpers::{TestStore, sample_tree};

#[tokio::test]
async fn test_sync_of_unchanged_tree_is_noop() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    let docs = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    let meta_revision = test.meta.revision();
    let blob_revision = test.blobs.revision();
    let report = test.store.sync.update_folder(docs.id, &local).await.unwrap();

    assert!(report.is_noop());
    assert_eq!(report.skipped, 2);
    assert_eq!(test.meta.revision(), meta_revision);
    assert_eq!(test.blobs.revision(), blob_revision);
    assert_eq!(test.size_at("docs").await, 13);
}

#[tokio::test]
async fn test_sync_merges_changes_forward() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    let docs = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    // A stored-only file survives the sync.
    test.write("keep.txt", b"keep");
    let keep = test.local_file("keep.txt").await;
    test.store.uploads.upload_file(&keep, docs.id, true).await.unwrap();

    test.write("docs/readme.txt", b"hello again");
    test.write("docs/new.txt", b"new");
    test.write("docs/extra/deep/x.txt", b"xx");
    let changed = test.local_tree("docs").await;

    let report = test.store.sync.update_folder(docs.id, &changed).await.unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.uploaded, 2);
    assert_eq!(report.folders_created, 2);

    assert_eq!(test.content_at("docs/readme.txt").await, b"hello again");
    assert_eq!(test.content_at("docs/extra/deep/x.txt").await, b"xx");
    assert!(test.store.paths.file_exists_at("docs/keep.txt", '/').await.unwrap());
    assert_eq!(test.size_at("docs/extra").await, 2);
    assert_eq!(test.size_at("docs").await, 11 + 8 + 4 + 3 + 2);
    assert_eq!(test.size_at("").await, 28);

    let again = test.store.sync.update_folder(docs.id, &changed).await.unwrap();
    assert!(again.is_noop());
}

#[tokio::test]
async fn test_sync_replaces_same_size_different_content() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    let docs = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    test.write("docs/readme.txt", b"HELLO");
    let changed = test.local_tree("docs").await;
    let report = test.store.sync.update_folder(docs.id, &changed).await.unwrap();

    assert_eq!(report.replaced, 1);
    assert_eq!(test.size_at("docs").await, 13);
    assert_eq!(test.content_at("docs/readme.txt").await, b"HELLO");
}
