//! Integration tests for zip export.

use std::collections::BTreeSet;
use std::io::{Cursor, Read};

use zip::ZipArchive;

use arbor_core::config::AppConfig;
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

fn check_archive<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>) {
    let names: BTreeSet<String> = archive.file_names().map(str::to_string).collect();
    let expected: BTreeSet<String> = ["readme.txt", "img/logo.png"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(names, expected);

    let comment = String::from_utf8_lossy(archive.comment()).to_string();
    assert!(comment.starts_with("Archive of folder docs on "), "{comment}");

    let mut content = Vec::new();
    archive
        .by_name("img/logo.png")
        .unwrap()
        .read_to_end(&mut content)
        .unwrap();
    assert_eq!(content, b"\x89PNGdata");

    let mut content = String::new();
    archive
        .by_name("readme.txt")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "hello");
}

#[tokio::test]
async fn test_collect_is_breadth_first() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;

    let plan = test.store.archives.collect(docs.id).await.unwrap();
    let paths: Vec<_> = plan.entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["readme.txt", "img/logo.png"]);
    assert_eq!(plan.total_bytes(), 13);
}

#[tokio::test]
async fn test_export_to_file() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let dest = test.path("docs.zip");

    let summary = test.store.archives.export_to_file(docs.id, &dest).await.unwrap();
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.bytes, 13);

    let file = std::fs::File::open(&dest).unwrap();
    let mut archive = ZipArchive::new(file).unwrap();
    check_archive(&mut archive);
}

#[tokio::test]
async fn test_export_to_writer() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;

    let (bytes, summary) = test
        .store
        .archives
        .export_to_writer(docs.id, Vec::new())
        .await
        .unwrap();
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.bytes, 13);

    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    check_archive(&mut archive);
}

#[tokio::test]
async fn test_export_into_dir_uses_folder_name() {
    let test = TestStore::new().await;
    let docs = with_docs(&test).await;
    let out = test.mkdir("out");

    let dest = test.store.archives.export_into_dir(docs.id, &out).await.unwrap();
    assert_eq!(dest, out.join("docs.zip"));
    assert!(dest.exists());
}

#[tokio::test]
async fn test_export_of_empty_folder() {
    let test = TestStore::new().await;
    let empty = test.store.folders.create_folder("empty", '/').await.unwrap();
    let dest = test.path("empty.zip");

    let summary = test.store.archives.export_to_file(empty.id, &dest).await.unwrap();
    assert_eq!(summary.entries, 0);

    let archive = ZipArchive::new(std::fs::File::open(&dest).unwrap()).unwrap();
    assert_eq!(archive.len(), 0);
}

#[tokio::test]
async fn test_buffered_export_removes_staged_files() {
    let staging = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.archive.temp_dir = Some(staging.path().to_string_lossy().into_owned());
    let test = TestStore::with_config(config).await;
    let docs = with_docs(&test).await;
    let dest = test.path("docs.zip");

    let summary = test.store.archives.export_to_file(docs.id, &dest).await.unwrap();
    assert_eq!(summary.entries, 2);

    let leftovers = std::fs::read_dir(staging.path()).unwrap().count();
    assert_eq!(leftovers, 0);
    let mut archive = ZipArchive::new(std::fs::File::open(&dest).unwrap()).unwrap();
    check_archive(&mut archive);
}
