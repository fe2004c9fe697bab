//! Tree ingestion: uploading local files and whole local directories.

use std::collections::{HashMap, VecDeque};

use tracing::{info, warn};

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{CreateFile, File};
use arbor_entity::folder::{CreateFolder, Folder};
use arbor_entity::local::{LocalFile, LocalFolder};
use arbor_storage::transfer::file_stream;

use super::signed_size;
use crate::context::StoreContext;
use crate::folder::naming::NameDisambiguator;
use crate::folder::rollup::SizeRollup;

/// Copies local files and directories into the store.
#[derive(Debug, Clone)]
pub struct UploadService {
    ctx: StoreContext,
    naming: NameDisambiguator,
    rollup: SizeRollup,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            naming: NameDisambiguator::new(ctx.clone()),
            rollup: SizeRollup::new(ctx.clone()),
            ctx,
        }
    }

    /// Upload one local file into a folder.
    ///
    /// The name is disambiguated against the folder's files. With `rollup`
    /// unset the caller takes over propagating the file's size.
    pub async fn upload_file(
        &self,
        local: &LocalFile,
        folder_id: FolderId,
        rollup: bool,
    ) -> AppResult<File> {
        let folder = self
            .ctx
            .meta
            .find_folder(folder_id)
            .await?
            .ok_or_else(|| AppError::folder_not_found(folder_id))?;
        let file = self.store_file(local, &folder).await?;
        if rollup {
            self.rollup.apply_delta(folder.id, file.size_bytes).await?;
        }
        Ok(file)
    }

    /// Upload a local directory tree below `parent_id`.
    ///
    /// Returns the new top folder with its final size. Folders are created
    /// from a worklist; each one rolls up the bytes of its own files once,
    /// along an ancestor chain derived from its parent's.
    pub async fn upload_folder(&self, local: &LocalFolder, parent_id: FolderId) -> AppResult<Folder> {
        let parent_chain = self.ctx.meta.find_ancestors(parent_id).await?;
        let mut chains: HashMap<FolderId, Vec<Folder>> = HashMap::from([(parent_id, parent_chain)]);
        let mut work: VecDeque<(&LocalFolder, FolderId)> = VecDeque::from([(local, parent_id)]);
        let mut top: Option<FolderId> = None;
        let mut files_uploaded = 0usize;

        while let Some((local_folder, parent_id)) = work.pop_front() {
            let parent_chain = chains
                .get(&parent_id)
                .ok_or_else(|| AppError::folder_not_found(parent_id))?;
            let parent_depth = parent_chain.first().map(|f| f.depth).unwrap_or_default();

            let name = self.naming.free_folder_name(parent_id, &local_folder.name).await?;
            let folder = self
                .ctx
                .meta
                .insert_folder(&CreateFolder {
                    parent_id: Some(parent_id),
                    name,
                    owner: local_folder.owner,
                    group: local_folder.group,
                    permissions: local_folder.permissions,
                    depth: parent_depth + 1,
                })
                .await?;

            let mut chain = Vec::with_capacity(parent_chain.len() + 1);
            chain.push(folder.clone());
            chain.extend(parent_chain.iter().cloned());

            let mut committed = 0i64;
            for local_file in &local_folder.files {
                match self.store_file(local_file, &folder).await {
                    Ok(file) => {
                        committed += file.size_bytes;
                        files_uploaded += 1;
                    }
                    Err(e) => {
                        warn!(
                            folder_id = %folder.id,
                            path = %local_file.absolute_path.display(),
                            error = %e,
                            "File upload failed, rolling up committed bytes"
                        );
                        self.rollup.apply_delta_along(&chain, committed).await?;
                        return Err(e);
                    }
                }
            }
            self.rollup.apply_delta_along(&chain, committed).await?;

            for sub in &local_folder.subfolders {
                work.push_back((sub, folder.id));
            }
            top.get_or_insert(folder.id);
            chains.insert(folder.id, chain);
        }

        let top = top.ok_or_else(|| AppError::internal("Upload created no folder"))?;
        let folder = self
            .ctx
            .meta
            .find_folder(top)
            .await?
            .ok_or_else(|| AppError::folder_not_found(top))?;
        info!(
            folder_id = %folder.id,
            name = %folder.name,
            folders = chains.len() - 1,
            files = files_uploaded,
            bytes = folder.size_bytes,
            "Uploaded folder"
        );
        Ok(folder)
    }

    /// Stream a local file into the blob store and insert its record,
    /// without touching ancestor sizes.
    async fn store_file(&self, local: &LocalFile, folder: &Folder) -> AppResult<File> {
        let name = self
            .naming
            .free_file_name(folder.id, &local.name, &local.extension)
            .await?;
        let id = FileId::new();
        let stream = file_stream(&local.absolute_path, self.ctx.chunk_size).await?;
        let receipt = self.ctx.blobs.put(&id.to_string(), stream).await?;

        let data = CreateFile {
            id,
            folder_id: folder.id,
            name,
            extension: local.extension.clone(),
            owner: local.owner,
            group: local.group,
            permissions: local.permissions,
            last_modified: local.last_modified,
            size_bytes: signed_size(receipt.size_bytes)?,
            checksum_sha256: receipt.checksum_sha256,
            uploaded_at: receipt.stored_at,
        };
        match self.ctx.meta.insert_file(&data).await {
            Ok(file) => {
                info!(
                    file_id = %file.id,
                    folder_id = %folder.id,
                    name = %file.full_name(),
                    bytes = file.size_bytes,
                    "Uploaded file"
                );
                Ok(file)
            }
            Err(e) => {
                if let Err(cleanup) = self.ctx.blobs.delete(&id.to_string()).await {
                    warn!(file_id = %id, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e)
            }
        }
    }
}
