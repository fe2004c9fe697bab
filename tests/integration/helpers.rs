//! Shared test helpers for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use arbor_core::config::AppConfig;
use arbor_database::MemoryMetadataStore;
use arbor_entity::local::{LocalFile, LocalFolder};
use arbor_service::TreeStore;
use arbor_storage::{MemoryBlobStore, read_local_file, read_local_tree};

/// A store over memory backends plus a scratch directory for local trees.
pub struct TestStore {
    /// The store under test
    pub store: TreeStore,
    /// Metadata backend, kept for revision checks
    pub meta: Arc<MemoryMetadataStore>,
    /// Blob backend, kept for revision checks
    pub blobs: Arc<MemoryBlobStore>,
    /// Scratch directory for local files
    pub workdir: TempDir,
}

impl TestStore {
    /// Create an empty store with a small chunk size so multi-chunk paths run.
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create an empty store over `config`, forcing a small chunk size.
    pub async fn with_config(mut config: AppConfig) -> Self {
        config.storage.chunk_size_bytes = 4;
        let meta = Arc::new(MemoryMetadataStore::new());
        let blobs = Arc::new(MemoryBlobStore::new(4));
        let store = TreeStore::open(meta.clone(), blobs.clone(), &config)
            .await
            .expect("Failed to open store");
        Self {
            store,
            meta,
            blobs,
            workdir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Absolute path of `rel` inside the scratch directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.workdir.path().join(rel)
    }

    /// Write a local file, creating parent directories.
    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Create an empty local directory.
    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Snapshot a local directory.
    pub async fn local_tree(&self, rel: &str) -> LocalFolder {
        read_local_tree(&self.path(rel))
            .await
            .expect("Failed to read local tree")
    }

    /// Snapshot a local file.
    pub async fn local_file(&self, rel: &str) -> LocalFile {
        read_local_file(&self.path(rel))
            .await
            .expect("Failed to read local file")
    }

    /// Size of the folder at `path`.
    pub async fn size_at(&self, path: &str) -> i64 {
        self.store
            .paths
            .resolve_folder(path, '/')
            .await
            .expect("Folder should resolve")
            .size_bytes
    }

    /// Read a stored file's content.
    pub async fn content_at(&self, path: &str) -> Vec<u8> {
        let file = self
            .store
            .paths
            .resolve_file(path, '/')
            .await
            .expect("File should resolve");
        let dest = self.path(&format!("out-{}", file.id));
        self.store
            .downloads
            .download_to_file(file.id, &dest)
            .await
            .expect("Download failed");
        std::fs::read(dest).expect("Failed to read download")
    }
}

/// Write the standard sample tree used by several tests:
///
/// ```text
/// docs/readme.txt   (5 bytes)
/// docs/img/logo.png (8 bytes)
/// ```
pub fn sample_tree(test: &TestStore) -> PathBuf {
    test.write("docs/readme.txt", b"hello");
    test.write("docs/img/logo.png", b"\x89PNGdata");
    test.path("docs")
}
