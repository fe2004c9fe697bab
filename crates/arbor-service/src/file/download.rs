//! Reading file content back out of the store.

use std::path::{Path, PathBuf};

use tracing::info;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::traits::blob::ByteStream;
use arbor_core::types::FileId;
use arbor_entity::file::File;
use arbor_entity::local::LocalFile;
use arbor_storage::transfer::{file_stream, streams_equal, write_stream_to_file};

use crate::context::StoreContext;

/// Streams stored content to callers and local files.
#[derive(Debug, Clone)]
pub struct DownloadService {
    ctx: StoreContext,
}

impl DownloadService {
    /// Creates a new download service.
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx }
    }

    async fn file(&self, id: FileId) -> AppResult<File> {
        self.ctx
            .meta
            .find_file(id)
            .await?
            .ok_or_else(|| AppError::file_not_found(id))
    }

    /// Open a file's content as a chunked stream.
    pub async fn open_stream(&self, id: FileId) -> AppResult<ByteStream> {
        let file = self.file(id).await?;
        self.ctx.blobs.open_read(&file.blob_key()).await
    }

    /// Write a file's content to `dest`. Returns the bytes written.
    pub async fn download_to_file(&self, id: FileId, dest: &Path) -> AppResult<u64> {
        let file = self.file(id).await?;
        let stream = self.ctx.blobs.open_read(&file.blob_key()).await?;
        let written = write_stream_to_file(stream, dest).await?;
        info!(file_id = %id, path = %dest.display(), bytes = written, "Downloaded file");
        Ok(written)
    }

    /// Write a file's content to `<dir>/<name>.<extension>`.
    pub async fn download_into_dir(&self, id: FileId, dir: &Path) -> AppResult<PathBuf> {
        let file = self.file(id).await?;
        let dest = dir.join(file.full_name());
        let stream = self.ctx.blobs.open_read(&file.blob_key()).await?;
        let written = write_stream_to_file(stream, &dest).await?;
        info!(file_id = %id, path = %dest.display(), bytes = written, "Downloaded file");
        Ok(dest)
    }

    /// Whether a stored file and a local file hold the same bytes.
    ///
    /// Sizes are compared first; content is only read when they match.
    pub async fn files_identical(&self, stored: &File, local: &LocalFile) -> AppResult<bool> {
        if u64::try_from(stored.size_bytes).ok() != Some(local.size_bytes) {
            return Ok(false);
        }
        let stored_stream = self.ctx.blobs.open_read(&stored.blob_key()).await?;
        let local_stream = file_stream(&local.absolute_path, self.ctx.chunk_size).await?;
        streams_equal(stored_stream, local_stream).await
    }
}
