//! PostgreSQL repositories and the [`MetadataStore`] built on them.

pub mod file;
pub mod folder;

pub use file::FileRepository;
pub use folder::FolderRepository;

use async_trait::async_trait;
use sqlx::PgPool;

use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{CreateFile, File};
use arbor_entity::folder::{CreateFolder, Folder};

use crate::store::MetadataStore;

/// Metadata store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgMetadataStore {
    folders: FolderRepository,
    files: FileRepository,
}

impl PgMetadataStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            folders: FolderRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }
}

#[async_trait]
impl MetadataStore for PgMetadataStore {
    async fn find_root(&self, name: &str) -> AppResult<Option<Folder>> {
        self.folders.find_root(name).await
    }

    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(id).await
    }

    async fn find_folder_by_name(
        &self,
        parent_id: FolderId,
        name: &str,
    ) -> AppResult<Option<Folder>> {
        self.folders.find_by_name(parent_id, name).await
    }

    async fn list_subfolders(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        self.folders.find_children(parent_id).await
    }

    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder> {
        self.folders.create(data).await
    }

    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<()> {
        self.folders.rename(id, name).await
    }

    async fn set_folder_parent(
        &self,
        id: FolderId,
        parent_id: FolderId,
        depth: i32,
    ) -> AppResult<()> {
        self.folders.move_folder(id, parent_id, depth).await
    }

    async fn set_folder_depth(&self, id: FolderId, depth: i32) -> AppResult<()> {
        self.folders.set_depth(id, depth).await
    }

    async fn increment_folder_size(&self, id: FolderId, delta: i64) -> AppResult<()> {
        self.folders.increment_size(id, delta).await
    }

    async fn remove_folder(&self, id: FolderId) -> AppResult<bool> {
        self.folders.delete(id).await
    }

    async fn find_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let chain = self.folders.find_ancestors(id).await?;
        if chain.is_empty() {
            return Err(arbor_core::AppError::folder_not_found(id));
        }
        Ok(chain)
    }

    async fn find_file(&self, id: FileId) -> AppResult<Option<File>> {
        self.files.find_by_id(id).await
    }

    async fn find_file_by_name(
        &self,
        folder_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<Option<File>> {
        self.files
            .find_by_folder_and_name(folder_id, name, extension)
            .await
    }

    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>> {
        self.files.find_by_folder(folder_id).await
    }

    async fn insert_file(&self, data: &CreateFile) -> AppResult<File> {
        self.files.create(data).await
    }

    async fn rename_file(&self, id: FileId, name: &str, extension: &str) -> AppResult<()> {
        self.files.rename(id, name, extension).await
    }

    async fn set_file_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<()> {
        self.files.move_to_folder(id, folder_id).await
    }

    async fn remove_file(&self, id: FileId) -> AppResult<bool> {
        self.files.delete(id).await
    }
}
