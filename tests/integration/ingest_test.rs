//! Integration tests for uploading local files and trees.

use arbor_entity::local::LocalFolder;

use crate::helpers::{TestStore, sample_tree};

#[tokio::test]
async fn test_upload_folder_sizes_and_depths() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;

    let docs = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();
    assert_eq!(docs.name, "docs");
    assert_eq!(docs.depth, 1);
    assert_eq!(docs.size_bytes, 13);

    let img = test.store.paths.resolve_folder("docs/img", '/').await.unwrap();
    assert_eq!(img.depth, 2);
    assert_eq!(img.size_bytes, 8);
    assert_eq!(test.size_at("").await, 13);

    assert_eq!(test.meta.folder_count(), 3);
    assert_eq!(test.meta.file_count(), 2);
    assert_eq!(test.blobs.len(), 2);
    assert_eq!(test.content_at("docs/img/logo.png").await, b"\x89PNGdata");
}

#[tokio::test]
async fn test_upload_file_names_are_disambiguated() {
    let test = TestStore::new().await;
    test.write("a.txt", b"abc");
    let local = test.local_file("a.txt").await;
    let root = test.store.root_id();

    let mut names = Vec::new();
    for _ in 0..3 {
        let file = test.store.uploads.upload_file(&local, root, true).await.unwrap();
        names.push(file.full_name());
    }
    assert_eq!(names, vec!["a.txt", "a (1).txt", "a (2).txt"]);
    assert_eq!(test.size_at("").await, 9);
}

#[tokio::test]
async fn test_upload_folder_twice_gets_numbered_name() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    let root = test.store.root_id();

    let first = test.store.uploads.upload_folder(&local, root).await.unwrap();
    let second = test.store.uploads.upload_folder(&local, root).await.unwrap();
    assert_eq!(first.name, "docs");
    assert_eq!(second.name, "docs (1)");
    assert_eq!(test.size_at("").await, 26);
    assert_eq!(test.size_at("docs (1)/img").await, 8);
}

#[tokio::test]
async fn test_upload_file_without_rollup_leaves_sizes() {
    let test = TestStore::new().await;
    test.write("a.txt", b"abc");
    let local = test.local_file("a.txt").await;

    let file = test
        .store
        .uploads
        .upload_file(&local, test.store.root_id(), false)
        .await
        .unwrap();
    assert_eq!(file.size_bytes, 3);
    assert_eq!(test.size_at("").await, 0);

    test.store.rollup.apply_delta(file.folder_id, file.size_bytes).await.unwrap();
    assert_eq!(test.size_at("").await, 3);
}

#[tokio::test]
async fn test_upload_into_nested_folder_rolls_up_every_ancestor() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    test.store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    test.write("extra.bin", b"0123456789");
    let extra = test.local_file("extra.bin").await;
    let img = test.store.paths.resolve_folder("docs/img", '/').await.unwrap();
    test.store.uploads.upload_file(&extra, img.id, true).await.unwrap();

    assert_eq!(test.size_at("docs/img").await, 18);
    assert_eq!(test.size_at("docs").await, 23);
    assert_eq!(test.size_at("").await, 23);
}

#[tokio::test]
async fn test_ingestion_ignores_child_order() {
    let forward = TestStore::new().await;
    forward.write("src/b/two.txt", b"22");
    forward.write("src/a/one.txt", b"1");
    forward.write("src/a/deep/three.txt", b"333");
    forward.write("src/top.txt", b"top!");
    let local = forward.local_tree("src").await;

    let mut reversed = local.clone();
    reverse_children(&mut reversed);

    let backward = TestStore::new().await;
    forward
        .store
        .uploads
        .upload_folder(&local, forward.store.root_id())
        .await
        .unwrap();
    backward
        .store
        .uploads
        .upload_folder(&reversed, backward.store.root_id())
        .await
        .unwrap();

    for path in ["", "src", "src/a", "src/a/deep", "src/b"] {
        let left = forward.store.paths.resolve_folder(path, '/').await.unwrap();
        let right = backward.store.paths.resolve_folder(path, '/').await.unwrap();
        assert_eq!(left.size_bytes, right.size_bytes, "{path}");
        assert_eq!(left.depth, right.depth, "{path}");
    }
    assert_eq!(forward.size_at("src").await, 10);
    assert_eq!(backward.content_at("src/a/deep/three.txt").await, b"333");
}

#[tokio::test]
async fn test_get_folder_with_children() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    let docs = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    let leaf = test.store.tree.get_folder(docs.id, false).await.unwrap();
    assert!(leaf.files.is_empty());
    assert!(leaf.subfolders.is_empty());

    let node = test.store.tree.get_folder(docs.id, true).await.unwrap();
    assert_eq!(node.file_count(), 2);
    assert_eq!(node.files[0].full_name(), "readme.txt");
    let img = node.subfolder("img").expect("img subfolder");
    assert_eq!(img.files[0].full_name(), "logo.png");
    assert_eq!(img.folder.size_bytes, 8);
}

#[tokio::test]
async fn test_upload_empty_folder() {
    let test = TestStore::new().await;
    test.mkdir("empty");
    let local = test.local_tree("empty").await;

    let folder = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();
    assert_eq!(folder.size_bytes, 0);
    assert_eq!(test.meta.folder_count(), 2);
    assert!(test.blobs.is_empty());
}

fn reverse_children(folder: &mut LocalFolder) {
    folder.files.reverse();
    folder.subfolders.reverse();
    for sub in &mut folder.subfolders {
        reverse_children(sub);
    }
}
