//! Folder mutations: create, rename, move, and delete.

use tracing::info;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::types::FolderId;
use arbor_entity::folder::{CreateFolder, Folder};

use crate::context::StoreContext;
use crate::file::service::FileService;
use crate::folder::resolver::segments;
use crate::folder::rollup::SizeRollup;
use crate::folder::tree::TreeService;

/// Mutates folders and keeps sizes and depths consistent.
#[derive(Debug, Clone)]
pub struct FolderService {
    ctx: StoreContext,
    tree: TreeService,
    files: FileService,
    rollup: SizeRollup,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            tree: TreeService::new(ctx.clone()),
            files: FileService::new(ctx.clone()),
            rollup: SizeRollup::new(ctx.clone()),
            ctx,
        }
    }

    /// Create every missing folder along `path` and return the last one.
    ///
    /// New folders inherit ownership and permissions from their parent.
    pub async fn create_folder(&self, path: &str, delimiter: char) -> AppResult<Folder> {
        let mut current = self.tree.folder(self.ctx.root_id).await?;
        for segment in segments(path, delimiter) {
            current = match self.ctx.meta.find_folder_by_name(current.id, segment).await? {
                Some(existing) => existing,
                None => {
                    let folder = self
                        .ctx
                        .meta
                        .insert_folder(&CreateFolder::child_of(&current, segment))
                        .await?;
                    info!(folder_id = %folder.id, parent_id = %current.id, name = segment, "Created folder");
                    folder
                }
            };
        }
        Ok(current)
    }

    /// Rename a folder. The root cannot be renamed.
    pub async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<Folder> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_argument("Folder name cannot be empty"));
        }
        let delimiter = self.ctx.delimiter();
        if name.contains(delimiter) {
            return Err(AppError::invalid_argument(format!(
                "Folder name cannot contain '{delimiter}'"
            )));
        }

        let mut folder = self.tree.folder(id).await?;
        let Some(parent_id) = folder.parent_id else {
            return Err(AppError::invalid_argument("Can't rename root folder"));
        };
        if folder.name == name {
            return Ok(folder);
        }
        if self
            .ctx
            .meta
            .find_folder_by_name(parent_id, name)
            .await?
            .is_some()
        {
            return Err(AppError::name_conflict(format!(
                "Folder '{name}' already exists in folder {parent_id}"
            )));
        }

        self.ctx.meta.rename_folder(id, name).await?;
        info!(folder_id = %id, from = %folder.name, to = name, "Renamed folder");
        folder.name = name.to_string();
        Ok(folder)
    }

    /// Move a folder under a new parent.
    ///
    /// The subtree's depths are re-levelled and its bytes move from the old
    /// ancestor chain to the new one.
    pub async fn move_folder(&self, id: FolderId, destination_id: FolderId) -> AppResult<Folder> {
        let folder = self.tree.folder(id).await?;
        let destination = self.tree.folder(destination_id).await?;
        let Some(old_parent_id) = folder.parent_id else {
            return Err(AppError::invalid_argument("Can't move root folder"));
        };

        let destination_chain = self.ctx.meta.find_ancestors(destination.id).await?;
        if destination_chain.iter().any(|f| f.id == folder.id) {
            return Err(AppError::invalid_argument(
                "Can't move a folder into itself or its own subtree",
            ));
        }
        if old_parent_id == destination.id {
            return Ok(folder);
        }
        if self
            .ctx
            .meta
            .find_folder_by_name(destination.id, &folder.name)
            .await?
            .is_some()
        {
            return Err(AppError::name_conflict(format!(
                "Folder '{}' already exists in folder {}",
                folder.name, destination.id
            )));
        }

        let old_chain = self.ctx.meta.find_ancestors(old_parent_id).await?;
        let new_depth = destination.depth + 1;
        let shift = new_depth - folder.depth;

        self.ctx
            .meta
            .set_folder_parent(folder.id, destination.id, new_depth)
            .await?;
        if shift != 0 {
            let subtree = self.tree.subtree_folders(folder.clone()).await?;
            for descendant in subtree.iter().skip(1) {
                self.ctx
                    .meta
                    .set_folder_depth(descendant.id, descendant.depth + shift)
                    .await?;
            }
        }
        self.rollup
            .apply_delta_along(&old_chain, -folder.size_bytes)
            .await?;
        self.rollup
            .apply_delta_along(&destination_chain, folder.size_bytes)
            .await?;

        info!(
            folder_id = %id,
            from = %old_parent_id,
            to = %destination.id,
            bytes = folder.size_bytes,
            "Moved folder"
        );
        self.tree.folder(id).await
    }

    /// Delete a folder with everything below it. The root cannot be deleted.
    pub async fn delete_folder(&self, id: FolderId) -> AppResult<()> {
        let folder = self.tree.folder(id).await?;
        if folder.is_root() {
            return Err(AppError::invalid_argument("Can't delete root folder"));
        }

        let subtree = self.tree.subtree_folders(folder).await?;
        let mut files_deleted = 0usize;
        for member in &subtree {
            for file in self.ctx.meta.list_files(member.id).await? {
                self.files.delete_file(file.id).await?;
                files_deleted += 1;
            }
        }
        // Breadth-first order reversed removes children before parents.
        for member in subtree.iter().rev() {
            self.ctx.meta.remove_folder(member.id).await?;
        }

        info!(
            folder_id = %id,
            folders = subtree.len(),
            files = files_deleted,
            "Deleted folder"
        );
        Ok(())
    }
}
