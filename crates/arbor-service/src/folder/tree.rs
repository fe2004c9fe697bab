//! Folder and file retrieval, including whole subtrees.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::File;
use arbor_entity::folder::{Folder, FolderNode};

use crate::context::StoreContext;
use crate::folder::resolver::PathResolver;

/// Read-only access to folders, files, and materialized trees.
#[derive(Debug, Clone)]
pub struct TreeService {
    ctx: StoreContext,
    resolver: PathResolver,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(ctx: StoreContext) -> Self {
        let resolver = PathResolver::new(ctx.clone());
        Self { ctx, resolver }
    }

    /// Fetch a folder record.
    pub async fn folder(&self, id: FolderId) -> AppResult<Folder> {
        self.ctx
            .meta
            .find_folder(id)
            .await?
            .ok_or_else(|| AppError::folder_not_found(id))
    }

    /// Fetch a folder, optionally with its whole subtree.
    pub async fn get_folder(&self, id: FolderId, include_children: bool) -> AppResult<FolderNode> {
        let folder = self.folder(id).await?;
        if !include_children {
            return Ok(FolderNode::leaf(folder));
        }
        self.build_tree(folder).await
    }

    /// Fetch a file record.
    pub async fn get_file(&self, id: FileId) -> AppResult<File> {
        self.ctx
            .meta
            .find_file(id)
            .await?
            .ok_or_else(|| AppError::file_not_found(id))
    }

    /// Fetch a folder by path.
    pub async fn get_folder_by_path(
        &self,
        path: &str,
        delimiter: char,
        include_children: bool,
    ) -> AppResult<FolderNode> {
        let folder = self.resolver.resolve_folder(path, delimiter).await?;
        if !include_children {
            return Ok(FolderNode::leaf(folder));
        }
        self.build_tree(folder).await
    }

    /// Fetch a file by path.
    pub async fn get_file_by_path(&self, path: &str, delimiter: char) -> AppResult<File> {
        self.resolver.resolve_file(path, delimiter).await
    }

    /// Fetch a subfolder by name.
    pub async fn get_folder_by_name(&self, parent_id: FolderId, name: &str) -> AppResult<Folder> {
        self.ctx
            .meta
            .find_folder_by_name(parent_id, name)
            .await?
            .ok_or_else(|| AppError::folder_name_not_found(name, parent_id))
    }

    /// Fetch a file by name and extension.
    pub async fn get_file_by_name(
        &self,
        folder_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<File> {
        self.ctx
            .meta
            .find_file_by_name(folder_id, name, extension)
            .await?
            .ok_or_else(|| AppError::file_name_not_found(name, extension, folder_id))
    }

    /// The parent of a folder, `None` for the root.
    pub async fn get_parent_folder(&self, folder: &Folder) -> AppResult<Option<Folder>> {
        match folder.parent_id {
            Some(parent_id) => self.folder(parent_id).await.map(Some),
            None => Ok(None),
        }
    }

    /// The folder holding a file.
    pub async fn get_file_folder(&self, file: &File) -> AppResult<Folder> {
        self.folder(file.folder_id).await
    }

    /// Every folder of the subtree rooted at `root`, breadth-first, root first.
    pub async fn subtree_folders(&self, root: Folder) -> AppResult<Vec<Folder>> {
        let mut folders = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(folder) = queue.pop_front() {
            queue.extend(self.ctx.meta.list_subfolders(folder.id).await?);
            folders.push(folder);
        }
        Ok(folders)
    }

    /// Load a subtree breadth-first and assemble it in memory.
    async fn build_tree(&self, root: Folder) -> AppResult<FolderNode> {
        let root_id = root.id;
        let folders = self.subtree_folders(root).await?;

        let mut files_by_folder: HashMap<FolderId, Vec<File>> = HashMap::new();
        let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();
        for folder in &folders {
            files_by_folder.insert(folder.id, self.ctx.meta.list_files(folder.id).await?);
            if let Some(parent_id) = folder.parent_id {
                children.entry(parent_id).or_default().push(folder.id);
            }
        }

        // Breadth-first order puts every child after its parent, so walking
        // it backwards always finds a folder's children already built.
        let mut built: HashMap<FolderId, FolderNode> = HashMap::new();
        for folder in folders.into_iter().rev() {
            let id = folder.id;
            let subfolders = children
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|child| built.remove(&child))
                .collect();
            let node = FolderNode {
                folder,
                files: files_by_folder.remove(&id).unwrap_or_default(),
                subfolders,
            };
            built.insert(id, node);
        }

        let tree = built
            .remove(&root_id)
            .ok_or_else(|| AppError::folder_not_found(root_id))?;
        debug!(folder_id = %root_id, files = tree.file_count(), "Loaded folder tree");
        Ok(tree)
    }
}
