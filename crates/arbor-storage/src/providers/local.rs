//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::traits::blob::{BlobReceipt, BlobStore, ByteStream};

use crate::checksum::ChecksumHasher;

/// Blob store keeping each blob as a file under a root directory.
///
/// Blobs are sharded by the first two characters of their key so no single
/// directory grows without bound.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all blobs.
    root: PathBuf,
    /// Read chunk size.
    chunk_size: usize,
}

impl LocalBlobStore {
    /// Create a new store rooted at the given path.
    pub async fn new(root_path: &str, chunk_size: usize) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            chunk_size: chunk_size.max(1),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its file path.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(AppError::invalid_argument(format!("Invalid blob key: {key}")));
        }
        let shard: String = key.chars().take(2).collect();
        Ok(self.root.join(shard).join(key))
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Resource,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// Copy every chunk into `file`, hashing as it goes, and flush.
async fn write_chunks(file: &mut fs::File, stream: &mut ByteStream) -> AppResult<ChecksumHasher> {
    let mut hasher = ChecksumHasher::new();
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| AppError::with_source(ErrorKind::Resource, "Stream read error", e))?;
        hasher.update(&chunk);
        file.write_all(&chunk).await.map_err(|e| {
            AppError::with_source(ErrorKind::Resource, "Failed to write chunk", e)
        })?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Resource, "Failed to flush blob", e))?;
    Ok(hasher)
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn put(&self, key: &str, mut stream: ByteStream) -> AppResult<BlobReceipt> {
        let full_path = self.resolve(key)?;
        self.ensure_parent(&full_path).await?;
        let partial_path = full_path.with_file_name(format!("{key}.partial"));

        let mut file = fs::File::create(&partial_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to create blob: {key}"),
                e,
            )
        })?;

        let hasher = match write_chunks(&mut file, &mut stream).await {
            Ok(hasher) => hasher,
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&partial_path).await;
                return Err(e);
            }
        };
        drop(file);

        fs::rename(&partial_path, &full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to commit blob: {key}"),
                e,
            )
        })?;

        let (size_bytes, checksum_sha256) = hasher.finish();
        debug!(key, bytes = size_bytes, "Wrote blob from stream");
        Ok(BlobReceipt {
            size_bytes,
            checksum_sha256,
            stored_at: Utc::now(),
        })
    }

    async fn open_read(&self, key: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(key)?;
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {key}"))
            } else {
                AppError::with_source(
                    ErrorKind::Resource,
                    format!("Failed to open blob: {key}"),
                    e,
                )
            }
        })?;

        Ok(Box::pin(ReaderStream::with_capacity(file, self.chunk_size)))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_path = self.resolve(key)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(key, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to delete blob: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_path = self.resolve(key)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to check blob: {key}"),
                e,
            )
        })
    }
}
