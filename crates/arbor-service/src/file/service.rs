//! File mutations: rename, move, delete, and content replacement.

use tracing::{info, warn};

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::traits::blob::BlobReceipt;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{CreateFile, File};
use arbor_entity::local::LocalFile;
use arbor_storage::transfer::file_stream;

use super::signed_size;
use crate::context::StoreContext;
use crate::folder::rollup::SizeRollup;

/// Mutates file records and keeps folder sizes in step.
#[derive(Debug, Clone)]
pub struct FileService {
    ctx: StoreContext,
    rollup: SizeRollup,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            rollup: SizeRollup::new(ctx.clone()),
            ctx,
        }
    }

    async fn file(&self, id: FileId) -> AppResult<File> {
        self.ctx
            .meta
            .find_file(id)
            .await?
            .ok_or_else(|| AppError::file_not_found(id))
    }

    /// Rename a file.
    ///
    /// A sibling in the same folder already holding the target name and
    /// extension fails with `NotFound`, naming the attempted pair.
    pub async fn rename_file(&self, id: FileId, name: &str, extension: &str) -> AppResult<File> {
        let name = name.trim();
        let extension = extension.trim();
        if name.is_empty() {
            return Err(AppError::invalid_argument("File name cannot be empty"));
        }
        let delimiter = self.ctx.delimiter();
        if name.contains(delimiter) || extension.contains(delimiter) {
            return Err(AppError::invalid_argument(format!(
                "File name cannot contain '{delimiter}'"
            )));
        }

        let mut file = self.file(id).await?;
        if file.name == name && file.extension == extension {
            return Ok(file);
        }
        if self
            .ctx
            .meta
            .find_file_by_name(file.folder_id, name, extension)
            .await?
            .is_some()
        {
            return Err(AppError::file_name_not_found(name, extension, file.folder_id));
        }

        self.ctx.meta.rename_file(id, name, extension).await?;
        info!(file_id = %id, from = %file.full_name(), name, extension, "Renamed file");
        file.name = name.to_string();
        file.extension = extension.to_string();
        Ok(file)
    }

    /// Move a file into another folder.
    pub async fn move_file(&self, id: FileId, folder_id: FolderId) -> AppResult<File> {
        let mut file = self.file(id).await?;
        let destination = self
            .ctx
            .meta
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::folder_not_found(folder_id))?;
        if file.folder_id == destination.id {
            return Ok(file);
        }
        if self
            .ctx
            .meta
            .find_file_by_name(destination.id, &file.name, &file.extension)
            .await?
            .is_some()
        {
            return Err(AppError::name_conflict(format!(
                "File '{}' already exists in folder {}",
                file.full_name(),
                destination.id
            )));
        }

        let source = file.folder_id;
        self.ctx.meta.set_file_folder(id, destination.id).await?;
        self.rollup.apply_delta(source, -file.size_bytes).await?;
        self.rollup.apply_delta(destination.id, file.size_bytes).await?;

        info!(file_id = %id, from = %source, to = %destination.id, "Moved file");
        file.folder_id = destination.id;
        Ok(file)
    }

    /// Delete a file record and its blob. Returns the removed record.
    pub async fn delete_file(&self, id: FileId) -> AppResult<File> {
        let file = self.file(id).await?;
        if !self.ctx.meta.remove_file(id).await? {
            return Err(AppError::file_not_found(id));
        }
        self.rollup.apply_delta(file.folder_id, -file.size_bytes).await?;
        self.ctx.blobs.delete(&file.blob_key()).await?;
        info!(file_id = %id, name = %file.full_name(), bytes = file.size_bytes, "Deleted file");
        Ok(file)
    }

    /// Replace a stored file's content with a local file's.
    ///
    /// The new content gets a new id. Name, extension, ownership,
    /// permissions, and folder are carried over from the stored record.
    /// The old size leaves the ancestor chain as soon as the old record is
    /// gone, and the new size joins it once the new record exists. If the
    /// new record cannot be written, the new blob is removed again.
    pub async fn replace_file(&self, stored: &File, local: &LocalFile) -> AppResult<File> {
        let id = FileId::new();
        let stream = file_stream(&local.absolute_path, self.ctx.chunk_size).await?;
        let receipt = self.ctx.blobs.put(&id.to_string(), stream).await?;

        let file = match self.swap_record(stored, local, id, receipt).await {
            Ok(file) => file,
            Err(e) => {
                if let Err(cleanup) = self.ctx.blobs.delete(&id.to_string()).await {
                    warn!(file_id = %id, error = %cleanup, "Failed to remove orphaned blob");
                }
                return Err(e);
            }
        };

        if let Err(e) = self.ctx.blobs.delete(&stored.blob_key()).await {
            warn!(file_id = %stored.id, error = %e, "Failed to delete replaced blob");
        }

        info!(
            old_id = %stored.id,
            new_id = %file.id,
            name = %file.full_name(),
            old_bytes = stored.size_bytes,
            new_bytes = file.size_bytes,
            "Replaced file"
        );
        Ok(file)
    }

    /// Remove the old record and insert the new one, keeping every
    /// ancestor's size in step with the records that exist.
    async fn swap_record(
        &self,
        stored: &File,
        local: &LocalFile,
        id: FileId,
        receipt: BlobReceipt,
    ) -> AppResult<File> {
        let data = CreateFile {
            id,
            folder_id: stored.folder_id,
            name: stored.name.clone(),
            extension: stored.extension.clone(),
            owner: stored.owner,
            group: stored.group,
            permissions: stored.permissions,
            last_modified: local.last_modified,
            size_bytes: signed_size(receipt.size_bytes)?,
            checksum_sha256: receipt.checksum_sha256,
            uploaded_at: receipt.stored_at,
        };
        let chain = self.ctx.meta.find_ancestors(stored.folder_id).await?;

        if !self.ctx.meta.remove_file(stored.id).await? {
            return Err(AppError::file_not_found(stored.id));
        }
        self.rollup.apply_delta_along(&chain, -stored.size_bytes).await?;

        let file = self.ctx.meta.insert_file(&data).await?;
        self.rollup.apply_delta_along(&chain, file.size_bytes).await?;
        Ok(file)
    }
}
