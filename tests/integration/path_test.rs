//! Integration tests for path resolution.

use arbor_core::error::ErrorKind;

use crate::helpers::{TestStore, sample_tree};

#[tokio::test]
async fn test_paths_round_trip() {
    let test = TestStore::new().await;
    let docs = sample_tree(&test);
    let local = test.local_tree("docs").await;
    assert_eq!(local.absolute_path, std::fs::canonicalize(docs).unwrap());
    test.store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    let logo = test.store.paths.resolve_file("docs/img/logo.png", '/').await.unwrap();
    assert_eq!(logo.name, "logo");
    assert_eq!(logo.extension, "png");
    assert_eq!(
        test.store.paths.file_path(&logo, '/').await.unwrap(),
        "docs/img/logo.png"
    );

    let img = test.store.paths.resolve_folder("docs/img", '/').await.unwrap();
    assert_eq!(img.id, logo.folder_id);
    assert_eq!(test.store.paths.folder_path(img.id, '/').await.unwrap(), "docs/img");
    assert_eq!(test.store.paths.folder_path(img.id, '\\').await.unwrap(), "docs\\img");
}

#[tokio::test]
async fn test_root_and_outer_delimiters() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    test.store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    for path in ["", "/", "//"] {
        let folder = test.store.paths.resolve_folder(path, '/').await.unwrap();
        assert_eq!(folder.id, test.store.root_id());
    }
    assert_eq!(
        test.store.paths.folder_path(test.store.root_id(), '/').await.unwrap(),
        ""
    );

    let img = test.store.paths.resolve_folder("/docs/img/", '/').await.unwrap();
    let same = test.store.paths.resolve_folder("docs\\img", '\\').await.unwrap();
    assert_eq!(img.id, same.id);
}

#[tokio::test]
async fn test_missing_paths() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    test.store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    let err = test.store.paths.resolve_folder("docs/nope", '/').await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.subject.unwrap().name.as_deref(), Some("nope"));

    let err = test.store.paths.resolve_file("docs/readme.md", '/').await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = test.store.paths.resolve_file("", '/').await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    assert!(test.store.paths.folder_exists_at("docs/img", '/').await.unwrap());
    assert!(!test.store.paths.folder_exists_at("docs/video", '/').await.unwrap());
    assert!(test.store.paths.file_exists_at("docs/readme.txt", '/').await.unwrap());
    assert!(!test.store.paths.file_exists_at("docs/readme", '/').await.unwrap());
}

#[tokio::test]
async fn test_lookup_by_name_and_parent() {
    let test = TestStore::new().await;
    sample_tree(&test);
    let local = test.local_tree("docs").await;
    let docs = test
        .store
        .uploads
        .upload_folder(&local, test.store.root_id())
        .await
        .unwrap();

    let readme = test.store.tree.get_file_by_name(docs.id, "readme", "txt").await.unwrap();
    assert_eq!(test.store.tree.get_file_folder(&readme).await.unwrap().id, docs.id);

    let img = test.store.tree.get_folder_by_name(docs.id, "img").await.unwrap();
    let parent = test.store.tree.get_parent_folder(&img).await.unwrap().unwrap();
    assert_eq!(parent.id, docs.id);

    let root = test.store.tree.folder(test.store.root_id()).await.unwrap();
    assert!(test.store.tree.get_parent_folder(&root).await.unwrap().is_none());
}
