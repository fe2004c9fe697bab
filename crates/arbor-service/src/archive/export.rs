//! Writing archive plans out as zip files.

use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use futures::stream::StreamExt;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use arbor_core::config::ArchiveCompression;
use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::types::FolderId;
use arbor_storage::transfer::write_stream_to_file;

use super::collect::{ArchivePlan, collect};
use crate::context::StoreContext;
use crate::folder::tree::TreeService;

/// What an export wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    /// Number of file entries.
    pub entries: usize,
    /// Uncompressed bytes across all entries.
    pub bytes: u64,
}

/// Exports folders as zip archives, buffered through temp files or
/// streamed straight into a writer.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    ctx: StoreContext,
    tree: TreeService,
}

impl ArchiveService {
    /// Creates a new archive service.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            tree: TreeService::new(ctx.clone()),
            ctx,
        }
    }

    /// Lay out the archive of a folder without writing anything.
    pub async fn collect(&self, folder_id: FolderId) -> AppResult<ArchivePlan> {
        let folder = self.tree.folder(folder_id).await?;
        collect(&self.ctx, folder).await
    }

    /// Download every file to a temp file, then write the archive to `dest`.
    ///
    /// Temp files are removed only after the archive is finalized.
    pub async fn export_to_file(&self, folder_id: FolderId, dest: &Path) -> AppResult<ArchiveSummary> {
        let plan = self.collect(folder_id).await?;
        let temp_dir = self
            .ctx
            .archive
            .temp_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        tokio::fs::create_dir_all(&temp_dir).await?;

        let mut staged: Vec<(String, i64, NamedTempFile)> = Vec::with_capacity(plan.entries.len());
        for entry in &plan.entries {
            let temp = NamedTempFile::new_in(&temp_dir).map_err(|e| {
                AppError::with_source(ErrorKind::Resource, "Failed to create temp file", e)
            })?;
            let stream = self.ctx.blobs.open_read(&entry.file.blob_key()).await?;
            write_stream_to_file(stream, temp.path()).await?;
            debug!(path = %entry.path, temp = %temp.path().display(), "Staged archive entry");
            staged.push((entry.path.clone(), entry.file.size_bytes, temp));
        }

        let compression = self.ctx.archive.compression;
        let comment = plan.comment.clone();
        let dest_path = dest.to_path_buf();
        let bytes = tokio::task::spawn_blocking(move || -> AppResult<u64> {
            let file = std::fs::File::create(&dest_path)?;
            let mut zip = ZipWriter::new(file);
            zip.set_comment(comment);
            let mut bytes = 0u64;
            for (path, size, temp) in &staged {
                zip.start_file(path.as_str(), entry_options(compression, *size))?;
                let mut source = std::fs::File::open(temp.path())?;
                bytes += std::io::copy(&mut source, &mut zip)?;
            }
            finalize(zip)?;
            // Dropping the staged entries removes their temp files.
            drop(staged);
            Ok(bytes)
        })
        .await
        .map_err(|e| AppError::internal(format!("Archive task failed: {e}")))??;

        let summary = ArchiveSummary {
            entries: plan.entries.len(),
            bytes,
        };
        info!(
            folder_id = %folder_id,
            path = %dest.display(),
            entries = summary.entries,
            bytes,
            "Exported folder archive"
        );
        Ok(summary)
    }

    /// Stream every file straight into a zip written to `writer`.
    ///
    /// At most one chunk per file is held in memory. Returns the writer
    /// after the archive is finalized.
    pub async fn export_to_writer<W: Write + Send>(
        &self,
        folder_id: FolderId,
        writer: W,
    ) -> AppResult<(W, ArchiveSummary)> {
        let plan = self.collect(folder_id).await?;
        let compression = self.ctx.archive.compression;

        let mut zip = ZipWriter::new_stream(writer);
        zip.set_comment(plan.comment.clone());
        let mut bytes = 0u64;
        for entry in &plan.entries {
            zip.start_file(
                entry.path.as_str(),
                entry_options(compression, entry.file.size_bytes),
            )?;
            let mut stream = self.ctx.blobs.open_read(&entry.file.blob_key()).await?;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| {
                    AppError::with_source(ErrorKind::Resource, "Stream read error", e)
                })?;
                zip.write_all(&chunk)?;
                bytes += chunk.len() as u64;
            }
        }
        let writer = zip.finish()?.into_inner();

        let summary = ArchiveSummary {
            entries: plan.entries.len(),
            bytes,
        };
        info!(
            folder_id = %folder_id,
            entries = summary.entries,
            bytes,
            "Streamed folder archive"
        );
        Ok((writer, summary))
    }

    /// Export a folder to `<dir>/<folder name>.zip`.
    pub async fn export_into_dir(&self, folder_id: FolderId, dir: &Path) -> AppResult<PathBuf> {
        let folder = self.tree.folder(folder_id).await?;
        let dest = dir.join(format!("{}.zip", folder.name));
        self.export_to_file(folder_id, &dest).await?;
        Ok(dest)
    }
}

fn entry_options(compression: ArchiveCompression, size: i64) -> SimpleFileOptions {
    let method = match compression {
        ArchiveCompression::Stored => CompressionMethod::Stored,
        ArchiveCompression::Deflated => CompressionMethod::Deflated,
    };
    SimpleFileOptions::default()
        .compression_method(method)
        .large_file(size >= i64::from(u32::MAX))
}

fn finalize<W: Write + Seek>(zip: ZipWriter<W>) -> AppResult<()> {
    let mut inner = zip.finish()?;
    inner.flush()?;
    Ok(())
}
